//! Byte spans and line/column locations.

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the start (inclusive)
    pub start: u32,
    /// Byte offset of the end (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Create a span from an offset and a length.
    #[inline]
    pub fn at(offset: u32, len: u32) -> Self {
        Self::new(offset, offset + len)
    }

    /// Length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`.
    #[inline]
    pub fn cover(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Get the source text for this span.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start as usize..span.end as usize
    }
}

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    /// The first column of the first line.
    pub const START: Location = Location { line: 1, column: 1 };

    /// Advance past `text`, expanding tabs to `tab_width` columns.
    ///
    /// `\r\n` counts as a single line break.
    pub fn advance(self, text: &str, tab_width: u32) -> Location {
        let mut line = self.line;
        let mut column = self.column;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    line += 1;
                    column = 1;
                }
                '\n' => {
                    line += 1;
                    column = 1;
                }
                '\t' => column += tab_width,
                _ => column += 1,
            }
        }
        Location { line, column }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::START
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_counts_columns() {
        let loc = Location::START.advance("abc", 4);
        assert_eq!(loc, Location { line: 1, column: 4 });
    }

    #[test]
    fn advance_expands_tabs() {
        let loc = Location::START.advance("\t\tx", 4);
        assert_eq!(loc, Location { line: 1, column: 10 });
        let loc = Location::START.advance("\t", 2);
        assert_eq!(loc, Location { line: 1, column: 3 });
    }

    #[test]
    fn advance_resets_column_after_newline() {
        let loc = Location { line: 3, column: 7 }.advance("/* a\n  bc */", 4);
        assert_eq!(loc, Location { line: 4, column: 8 });
    }

    #[test]
    fn crlf_is_one_line_break() {
        let loc = Location::START.advance("\r\n\r\n", 4);
        assert_eq!(loc, Location { line: 3, column: 1 });
        let loc = Location::START.advance("\r\r", 4);
        assert_eq!(loc, Location { line: 3, column: 1 });
    }

    #[test]
    fn span_helpers() {
        let span = Span::at(2, 3);
        assert_eq!(span, Span::new(2, 5));
        assert_eq!(span.len(), 3);
        assert_eq!(span.slice("abcdefg"), "cde");
        assert_eq!(span.cover(Span::new(0, 1)), Span::new(0, 5));
        assert!(Span::at(4, 0).is_empty());
    }
}
