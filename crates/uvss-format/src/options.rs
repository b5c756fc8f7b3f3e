//! Options for whitespace normalization.

/// Options for [`normalize_whitespace`](crate::normalize_whitespace).
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Indentation string per enclosing block (default: "    " - 4 spaces)
    pub indent: &'static str,

    /// Line break written between lines (default: "\n")
    pub end_of_line: &'static str,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            indent: "    ",
            end_of_line: "\n",
        }
    }
}

impl NormalizeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom indentation string.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Set the line break, e.g. `"\r\n"`.
    pub fn end_of_line(mut self, end_of_line: &'static str) -> Self {
        self.end_of_line = end_of_line;
        self
    }
}
