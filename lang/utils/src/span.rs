use std::{
    fmt::{Debug, Display},
    path::PathBuf,
    sync::Arc,
};

/// Line table of one source text, used to turn byte offsets into `line:column` cursors.
#[derive(Clone, Debug)]
pub struct FileInfo {
    /// Byte offsets at which each line starts.
    line_starts: Vec<usize>,
    len: usize,
    path: Option<Arc<PathBuf>>,
}
impl FileInfo {
    pub fn new(s: &str, path: Option<Arc<PathBuf>>) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in s.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        FileInfo { line_starts, len: s.len(), path }
    }
    /// Both line and column are one-based; offsets past the end are clamped.
    pub fn trans_span2(&self, offset: Cursor1) -> Cursor2 {
        let offset = offset.min(self.len);
        // [s0, s1, (s2 <= offset), s3]
        let idx = match self.line_starts.binary_search(&offset) {
            | Ok(idx) => idx,
            | Err(idx) => idx - 1,
        };
        Cursor2 { line: idx + 1, column: offset - self.line_starts[idx] + 1 }
    }
    pub fn path(&self) -> PathBuf {
        self.path.as_ref().map(|p| p.to_path_buf()).unwrap_or_default()
    }
    pub fn display_path(&self) -> String {
        match &self.path {
            | Some(path) => path.display().to_string(),
            | None => "<input>".to_string(),
        }
    }
}

/// A half-open byte range into the source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Cursor1,
    pub end: Cursor1,
}

impl Span {
    pub fn new(start: Cursor1, end: Cursor1) -> Span {
        Span { start, end }
    }
    pub fn dummy() -> Span {
        Span::new(0, 0)
    }
    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }
    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
    pub fn locate(&self, info: &FileInfo) -> (Cursor2, Cursor2) {
        (info.trans_span2(self.start), info.trans_span2(self.end))
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Span { start, end } = self;
        write!(f, "{start}-{end}")
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

pub type Cursor1 = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor2 {
    pub line: usize,
    pub column: usize,
}
impl Display for Cursor2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Cursor2 { line, column } = self;
        write!(f, "{line}:{column}",)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursor_of_offsets() {
        let info = FileInfo::new("ab\ncd\n\nef", None);
        assert_eq!(info.trans_span2(0), Cursor2 { line: 1, column: 1 });
        assert_eq!(info.trans_span2(2), Cursor2 { line: 1, column: 3 });
        assert_eq!(info.trans_span2(3), Cursor2 { line: 2, column: 1 });
        assert_eq!(info.trans_span2(6), Cursor2 { line: 3, column: 1 });
        assert_eq!(info.trans_span2(8), Cursor2 { line: 4, column: 2 });
        assert_eq!(info.trans_span2(100), Cursor2 { line: 4, column: 3 });
    }

    #[test]
    fn span_display() {
        let info = FileInfo::new("x = 1;\ny", None);
        let span = Span::new(4, 8);
        assert_eq!(format!("{span}"), "4-8");
        let (l, r) = span.locate(&info);
        assert_eq!(format!("{l} - {r}"), "1:5 - 2:2");
        assert_eq!(Span::new(1, 2).join(Span::new(0, 1)), Span::new(0, 2));
    }
}
