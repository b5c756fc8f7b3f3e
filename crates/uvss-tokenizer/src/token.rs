//! Token types for the UVSS lexer.

use crate::{Location, Span};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Trivia
    /// `\n`, `\r\n` or `\r`
    EndOfLine,
    /// `/* ... */` (runs to end of input when unterminated)
    MultiLineComment,
    /// `// ...` up to the end of the line
    SingleLineComment,
    /// Run of spaces and tabs
    WhiteSpace,

    // Words
    /// `$name`, or a lone `$`
    Directive,
    /// One of [`KEYWORDS`], including `!important`
    Keyword,
    /// `[A-Za-z_][A-Za-z0-9_-]*`
    Identifier,
    /// `\d+(\.\d*)?`
    Number,

    // Punctuation
    /// `{`
    OpenCurlyBrace,
    /// `}`
    CloseCurlyBrace,
    /// `(`
    OpenParenthesis,
    /// `)`
    CloseParenthesis,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `#`
    Hash,
    /// `*`
    Asterisk,
    /// `!`
    ExclamationMark,
    /// `@`
    AtSign,
    /// `|`
    Pipe,
    /// `=`
    Equals,
    /// `<>`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEquals,
    /// `>>`
    GreaterThanGreaterThan,
    /// `>?`
    GreaterThanQuestionMark,

    /// A single character no rule recognises
    Unknown,
}

impl TokenKind {
    /// Whether this token is trivia (whitespace, line breaks or comments).
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::EndOfLine
                | TokenKind::MultiLineComment
                | TokenKind::SingleLineComment
                | TokenKind::WhiteSpace
        )
    }

    /// Whether this token is whitespace or a line break.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::EndOfLine | TokenKind::WhiteSpace)
    }
}

/// The closed keyword set, longest spellings first.
pub const KEYWORDS: &[&str] = &[
    "play-storyboard",
    "set-handled",
    "!important",
    "transition",
    "animation",
    "keyframe",
    "play-sfx",
    "property",
    "handled",
    "trigger",
    "target",
    "event",
    "set",
    "as",
];

/// A token with its kind, span, location and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// Where the token starts.
    pub location: Location,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, location: Location, text: &'src str) -> Self {
        Self {
            kind,
            span,
            location,
            text,
        }
    }

    /// Byte offset of the token in the source.
    pub fn offset(&self) -> u32 {
        self.span.start
    }

    /// Length of the token in bytes.
    pub fn len(&self) -> u32 {
        self.span.len()
    }

    /// Whether the token covers no text.
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// 1-based line of the first character.
    pub fn line(&self) -> u32 {
        self.location.line
    }

    /// 1-based column of the first character.
    pub fn column(&self) -> u32 {
        self.location.column
    }
}
