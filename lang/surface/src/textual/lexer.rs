use super::err::{ParseError, ParseErrorKind};
use logos::Logos;
use std::fmt::{Debug, Display};
use unminify_syntax::CompoundOp;
use unminify_utils::span::Span;

/// Lexer state the parser never sees: whether a `/` here would open a regular expression.
#[derive(Clone, Copy, Debug)]
pub struct LexState {
    pub regex_allowed: bool,
}
impl Default for LexState {
    fn default() -> Self {
        LexState { regex_allowed: true }
    }
}

/// What a `/` turned out to be.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Slashed<'input> {
    Div,
    DivAssign,
    /// The whole literal, slashes and flags included.
    Regex(&'input str),
}

fn slash<'input>(lex: &mut logos::Lexer<'input, Tok<'input>>) -> Option<Slashed<'input>> {
    let assign = lex.slice() == "/=";
    if !lex.extras.regex_allowed {
        return Some(if assign { Slashed::DivAssign } else { Slashed::Div });
    }
    let source = lex.source();
    let start = lex.span().start;
    let body = &source[start + 1..];
    let mut in_class = false;
    let mut escaped = false;
    let mut end = None;
    for (i, c) in body.char_indices() {
        match c {
            | '\n' | '\r' | '\u{2028}' | '\u{2029}' => return None,
            | _ if escaped => escaped = false,
            | '\\' => escaped = true,
            | '[' => in_class = true,
            | ']' => in_class = false,
            | '/' if !in_class => {
                end = Some(i);
                break;
            }
            | _ => {}
        }
    }
    let end = end?;
    let flags = body[end + 1..]
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$'))
        .map(|(i, _)| i)
        .unwrap_or(body.len() - end - 1);
    // `/`, the body, `/`, the flags
    let total = 1 + end + 1 + flags;
    lex.bump(total - lex.slice().len());
    Some(Slashed::Regex(&source[start..start + total]))
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(extras = LexState)]
#[logos(skip r"[ \t\r\n\x0B\x0C\u{00A0}\u{FEFF}\u{2028}\u{2029}]+")]
#[logos(skip r"//[^\n\r\u{2028}\u{2029}]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Tok<'input> {
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident(&'input str),
    #[regex(r"([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[oO][0-7]+")]
    #[regex(r"0[bB][01]+")]
    Number(&'input str),
    #[regex(r#""([^"\\\n\r]|\\(\r\n|[^\r\n]|\r|\n))*""#)]
    #[regex(r#"'([^'\\\n\r]|\\(\r\n|[^\r\n]|\r|\n))*'"#)]
    Str(&'input str),

    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("debugger")]
    Debugger,
    #[token("default")]
    Default,
    #[token("delete")]
    Delete,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("instanceof")]
    Instanceof,
    #[token("let")]
    Let,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("return")]
    Return,
    #[token("switch")]
    Switch,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("true")]
    True,
    #[token("try")]
    Try,
    #[token("typeof")]
    Typeof,
    #[token("var")]
    Var,
    #[token("void")]
    Void,
    #[token("while")]
    While,
    #[token("with")]
    With,

    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=>")]
    FatArrow,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    NotEqEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("%")]
    Percent,
    #[token("**")]
    StarStar,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    UShr,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("=")]
    Assign,
    #[token("+=", |_| CompoundOp::Add)]
    #[token("-=", |_| CompoundOp::Sub)]
    #[token("*=", |_| CompoundOp::Mul)]
    #[token("%=", |_| CompoundOp::Rem)]
    #[token("**=", |_| CompoundOp::Exp)]
    #[token("<<=", |_| CompoundOp::Shl)]
    #[token(">>=", |_| CompoundOp::Shr)]
    #[token(">>>=", |_| CompoundOp::UShr)]
    #[token("&=", |_| CompoundOp::BitAnd)]
    #[token("|=", |_| CompoundOp::BitOr)]
    #[token("^=", |_| CompoundOp::BitXor)]
    CompoundAssign(CompoundOp),
    /// Division, division-assignment or a regular expression, decided by what came before.
    #[token("/", slash)]
    #[token("/=", slash)]
    Slash(Slashed<'input>),
}

impl Tok<'_> {
    /// Whether a `/` right after this token starts a regular expression.
    fn allows_regex_after(&self) -> bool {
        !matches!(
            self,
            Tok::Ident(_)
                | Tok::Number(_)
                | Tok::Str(_)
                | Tok::Slash(Slashed::Regex(_))
                | Tok::ParenClose
                | Tok::BracketClose
                | Tok::This
                | Tok::Null
                | Tok::True
                | Tok::False
                | Tok::PlusPlus
                | Tok::MinusMinus
        )
    }
    /// The spelling of keywords, usable as a property name after `.` or in an object literal.
    pub fn keyword(&self) -> Option<&'static str> {
        let kw = match self {
            | Tok::Break => "break",
            | Tok::Case => "case",
            | Tok::Catch => "catch",
            | Tok::Const => "const",
            | Tok::Continue => "continue",
            | Tok::Debugger => "debugger",
            | Tok::Default => "default",
            | Tok::Delete => "delete",
            | Tok::Do => "do",
            | Tok::Else => "else",
            | Tok::False => "false",
            | Tok::Finally => "finally",
            | Tok::For => "for",
            | Tok::Function => "function",
            | Tok::If => "if",
            | Tok::In => "in",
            | Tok::Instanceof => "instanceof",
            | Tok::Let => "let",
            | Tok::New => "new",
            | Tok::Null => "null",
            | Tok::Return => "return",
            | Tok::Switch => "switch",
            | Tok::This => "this",
            | Tok::Throw => "throw",
            | Tok::True => "true",
            | Tok::Try => "try",
            | Tok::Typeof => "typeof",
            | Tok::Var => "var",
            | Tok::Void => "void",
            | Tok::While => "while",
            | Tok::With => "with",
            | _ => return None,
        };
        Some(kw)
    }
}

impl Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(kw) = self.keyword() {
            return write!(f, "{kw}");
        }
        match self {
            | Tok::Ident(s) => write!(f, "Ident({})", s),
            | Tok::Number(s) => write!(f, "Number({})", s),
            | Tok::Str(s) => write!(f, "Str({})", s),
            | Tok::BraceOpen => write!(f, "{{"),
            | Tok::BraceClose => write!(f, "}}"),
            | Tok::ParenOpen => write!(f, "("),
            | Tok::ParenClose => write!(f, ")"),
            | Tok::BracketOpen => write!(f, "["),
            | Tok::BracketClose => write!(f, "]"),
            | Tok::Semicolon => write!(f, ";"),
            | Tok::Comma => write!(f, ","),
            | Tok::Dot => write!(f, "."),
            | Tok::Ellipsis => write!(f, "..."),
            | Tok::Question => write!(f, "?"),
            | Tok::Colon => write!(f, ":"),
            | Tok::FatArrow => write!(f, "=>"),
            | Tok::Lt => write!(f, "<"),
            | Tok::Gt => write!(f, ">"),
            | Tok::Le => write!(f, "<="),
            | Tok::Ge => write!(f, ">="),
            | Tok::EqEq => write!(f, "=="),
            | Tok::NotEq => write!(f, "!="),
            | Tok::EqEqEq => write!(f, "==="),
            | Tok::NotEqEq => write!(f, "!=="),
            | Tok::Plus => write!(f, "+"),
            | Tok::Minus => write!(f, "-"),
            | Tok::Star => write!(f, "*"),
            | Tok::Percent => write!(f, "%"),
            | Tok::StarStar => write!(f, "**"),
            | Tok::PlusPlus => write!(f, "++"),
            | Tok::MinusMinus => write!(f, "--"),
            | Tok::Shl => write!(f, "<<"),
            | Tok::Shr => write!(f, ">>"),
            | Tok::UShr => write!(f, ">>>"),
            | Tok::Amp => write!(f, "&"),
            | Tok::Pipe => write!(f, "|"),
            | Tok::Caret => write!(f, "^"),
            | Tok::Bang => write!(f, "!"),
            | Tok::Tilde => write!(f, "~"),
            | Tok::AmpAmp => write!(f, "&&"),
            | Tok::PipePipe => write!(f, "||"),
            | Tok::Assign => write!(f, "="),
            | Tok::CompoundAssign(op) => write!(f, "{}", op),
            | Tok::Slash(Slashed::Div) => write!(f, "/"),
            | Tok::Slash(Slashed::DivAssign) => write!(f, "/="),
            | Tok::Slash(Slashed::Regex(s)) => write!(f, "Regex({})", s),
            | _ => write!(f, "?"),
        }
    }
}

/// A token with its source range and whether a line break precedes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexeme<'input> {
    pub tok: Tok<'input>,
    pub span: Span,
    pub newline_before: bool,
}

/// Splits the whole source into tokens up front.
pub struct Lexer<'source> {
    source: &'source str,
    inner: logos::Lexer<'source, Tok<'source>>,
    last_end: usize,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self { source, inner: Tok::lexer(source), last_end: 0 }
    }
    pub fn tokenize(self) -> Result<Vec<Lexeme<'source>>, ParseError> {
        self.collect()
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Lexeme<'source>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let tok = self.inner.next()?;
        let range = self.inner.span();
        let span = Span::new(range.start, range.end);
        let gap = &self.source[self.last_end.min(range.start)..range.start];
        let newline_before = gap.contains(['\n', '\r', '\u{2028}', '\u{2029}']);
        self.last_end = range.end;
        match tok {
            | Ok(tok) => {
                self.inner.extras.regex_allowed = tok.allows_regex_after();
                Some(Ok(Lexeme { tok, span, newline_before }))
            }
            | Err(()) => Some(Err(ParseError::new(ParseErrorKind::InvalidToken, span))),
        }
    }
}
