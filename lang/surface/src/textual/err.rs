use ariadne::{Label, Report, ReportKind};
use std::fmt::Display;
use thiserror::Error;
use unminify_utils::span::{Cursor2, FileInfo, Span};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidToken,
    UnexpectedToken { found: String, expected: Vec<String> },
    UnexpectedEof { expected: Vec<String> },
    InvalidAssignmentTarget,
    InvalidLiteral(String),
    Unsupported(String),
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | ParseErrorKind::InvalidToken => write!(f, "Invalid token"),
            | ParseErrorKind::UnexpectedToken { found, expected } => {
                write!(f, "Unrecognized token `{found}`{}", fmt_expected(expected))
            }
            | ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "Unrecognized EOF{}", fmt_expected(expected))
            }
            | ParseErrorKind::InvalidAssignmentTarget => write!(f, "Invalid assignment target"),
            | ParseErrorKind::InvalidLiteral(lit) => write!(f, "Invalid literal `{lit}`"),
            | ParseErrorKind::Unsupported(what) => write!(f, "Unsupported syntax: {what}"),
        }
    }
}

/// Where an error points: a byte range until the line table is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Offset(Span),
    Cursor(Cursor2),
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Location::Offset(span) => write!(f, "{span}"),
            | Location::Cursor(cursor) => write!(f, "{cursor}"),
        }
    }
}

/// Malformed input, with where it went wrong.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{kind} at {at}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub at: Location,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span, at: Location::Offset(span) }
    }
    pub fn located(mut self, info: &FileInfo) -> Self {
        self.at = Location::Cursor(info.trans_span2(self.span.start));
        self
    }
    /// Create an Ariadne report for this parse error.
    pub fn to_report(&self, info: &FileInfo) -> Report<'static, (String, std::ops::Range<usize>)> {
        let file_path = info.display_path();
        let Span { start, end } = self.span;
        let (l, r) = self.span.locate(info);
        let label = match &self.kind {
            | ParseErrorKind::InvalidToken => format!("invalid token at {}", l),
            | ParseErrorKind::UnexpectedToken { found, .. } => {
                format!("unrecognized token `{}` found at {} - {}", found, l, r)
            }
            | ParseErrorKind::UnexpectedEof { .. } => format!("unexpected end of file at {}", l),
            | ParseErrorKind::InvalidAssignmentTarget => {
                format!("cannot assign to this expression at {} - {}", l, r)
            }
            | ParseErrorKind::InvalidLiteral(_) => format!("malformed literal at {} - {}", l, r),
            | ParseErrorKind::Unsupported(what) => format!("{} is not supported", what),
        };
        let message = match &self.kind {
            | ParseErrorKind::UnexpectedToken { found, .. } => {
                format!("Unrecognized token `{}`", found)
            }
            | ParseErrorKind::UnexpectedEof { .. } => "Unrecognized EOF".to_string(),
            | kind => kind.to_string(),
        };
        let mut report = Report::build(ReportKind::Error, file_path.clone(), start)
            .with_message(message)
            .with_label(Label::new((file_path, start..end.max(start))).with_message(label));
        if let ParseErrorKind::UnexpectedToken { expected, .. }
        | ParseErrorKind::UnexpectedEof { expected } = &self.kind
        {
            let expected_msg = fmt_expected(expected);
            if !expected_msg.is_empty() {
                report = report.with_note(expected_msg.trim_start_matches("; ").to_string());
            }
        }
        report.finish()
    }
}

fn fmt_expected(expected: &[String]) -> String {
    let mut res = String::new();
    if !expected.is_empty() {
        res += "; ";
        for (i, e) in expected.iter().enumerate() {
            let sep = match i {
                | 0 => "Expected one of",
                | _ if i < expected.len() - 1 => ",",
                // Last expected message to be written
                | _ => " or",
            };
            res += &format!("{} {}", sep, e);
        }
    }
    res
}

pub type Result<T> = std::result::Result<T, ParseError>;
