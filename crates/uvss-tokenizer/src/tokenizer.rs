//! Tokenizer for the UVSS styling language.

use crate::{KEYWORDS, Location, Span, Token, TokenKind};
use tracing::trace;

/// Options controlling the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Number of columns a tab advances the column counter (default: 4)
    pub tab_width: u32,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self { tab_width: 4 }
    }
}

impl TokenizerOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tab width used for column tracking.
    pub fn tab_width(mut self, width: u32) -> Self {
        self.tab_width = width;
        self
    }
}

/// A tokenizer that produces tokens from UVSS source text.
///
/// Tokens are pulled one at a time with [`Tokenizer::emit`] (or through the
/// `Iterator` impl); nothing is tokenized ahead of the caller.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Line/column of `pos`.
    location: Location,
    options: TokenizerOptions,
}

/// Tokenize a whole source text with default options.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Tokenizer::new(source).collect()
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, TokenizerOptions::default())
    }

    /// Create a new tokenizer with explicit options.
    pub fn with_options(source: &'src str, options: TokenizerOptions) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            location: Location::START,
            options,
        }
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Get the current line/column.
    #[inline]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Check if the remaining text starts with the given prefix.
    #[inline]
    fn starts_with(&self, prefix: &str) -> bool {
        self.remaining.starts_with(prefix)
    }

    /// Consume `len` bytes and produce a token of `kind` for them.
    fn token(&mut self, kind: TokenKind, len: usize) -> Token<'src> {
        let start = self.pos;
        let text = &self.remaining[..len];
        let span = Span::at(start, len as u32);
        let location = self.location;

        self.pos += len as u32;
        self.remaining = &self.remaining[len..];
        self.location = location.advance(text, self.options.tab_width);

        trace!("Token {:?} at {:?} ({}:{}): {:?}", kind, span, location.line, location.column, text);
        Token::new(kind, span, location, text)
    }

    /// Get the next token, or `None` at the end of input.
    pub fn emit(&mut self) -> Option<Token<'src>> {
        let c = self.peek()?;

        let token = match c {
            '\r' if self.peek_nth(1) == Some('\n') => self.token(TokenKind::EndOfLine, 2),
            '\r' | '\n' => self.token(TokenKind::EndOfLine, 1),
            '/' if self.starts_with("/*") => self.multi_line_comment(),
            '/' if self.starts_with("//") => self.single_line_comment(),
            ' ' | '\t' => self.whitespace(),
            '$' => self.directive(),
            _ => {
                if let Some(len) = self.keyword_len() {
                    self.token(TokenKind::Keyword, len)
                } else if is_identifier_start(c) {
                    self.identifier()
                } else if c.is_ascii_digit() {
                    self.number()
                } else if let Some((kind, len)) = self.punctuation() {
                    self.token(kind, len)
                } else {
                    self.token(TokenKind::Unknown, c.len_utf8())
                }
            }
        };
        Some(token)
    }

    /// Tokenize a multi-line comment: `/* ... */`.
    ///
    /// The opening marker is recognised first; the comment then extends to
    /// the first `*/`, or to the end of input if it is never closed.
    fn multi_line_comment(&mut self) -> Token<'src> {
        let len = match self.remaining[2..].find("*/") {
            Some(end) => 2 + end + 2,
            None => self.remaining.len(),
        };
        self.token(TokenKind::MultiLineComment, len)
    }

    /// Tokenize a single-line comment: `// ...` (line break excluded).
    fn single_line_comment(&mut self) -> Token<'src> {
        let len = self
            .remaining
            .find(['\r', '\n'])
            .unwrap_or(self.remaining.len());
        self.token(TokenKind::SingleLineComment, len)
    }

    /// Tokenize horizontal whitespace (spaces and tabs).
    fn whitespace(&mut self) -> Token<'src> {
        let len = self
            .remaining
            .find(|c| c != ' ' && c != '\t')
            .unwrap_or(self.remaining.len());
        self.token(TokenKind::WhiteSpace, len)
    }

    /// Tokenize `$` followed by an optional identifier.
    fn directive(&mut self) -> Token<'src> {
        let rest = &self.remaining[1..];
        let name_len = match rest.chars().next() {
            Some(c) if is_identifier_start(c) => identifier_len(rest),
            _ => 0,
        };
        self.token(TokenKind::Directive, 1 + name_len)
    }

    /// Length of the keyword at the current position, if one matches.
    ///
    /// A keyword must not be followed by an identifier character, so that
    /// `trigger-root` stays an identifier.
    fn keyword_len(&self) -> Option<usize> {
        KEYWORDS.iter().find_map(|keyword| {
            let rest = self.remaining.strip_prefix(keyword)?;
            match rest.chars().next() {
                Some(c) if is_identifier_char(c) => None,
                _ => Some(keyword.len()),
            }
        })
    }

    /// Tokenize an identifier.
    fn identifier(&mut self) -> Token<'src> {
        let len = identifier_len(self.remaining);
        self.token(TokenKind::Identifier, len)
    }

    /// Tokenize a number: digits with an optional fraction.
    fn number(&mut self) -> Token<'src> {
        let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let mut len = digits(self.remaining);
        if self.remaining[len..].starts_with('.') {
            len += 1;
            len += digits(&self.remaining[len..]);
        }
        self.token(TokenKind::Number, len)
    }

    /// Match the punctuation set; two-character forms win.
    fn punctuation(&self) -> Option<(TokenKind, usize)> {
        const DOUBLE: &[(&str, TokenKind)] = &[
            (">>", TokenKind::GreaterThanGreaterThan),
            (">?", TokenKind::GreaterThanQuestionMark),
            (">=", TokenKind::GreaterThanEquals),
            ("<=", TokenKind::LessThanEquals),
            ("<>", TokenKind::NotEquals),
        ];
        if let Some((text, kind)) = DOUBLE.iter().find(|(text, _)| self.starts_with(text)) {
            return Some((*kind, text.len()));
        }

        let kind = match self.peek()? {
            '{' => TokenKind::OpenCurlyBrace,
            '}' => TokenKind::CloseCurlyBrace,
            '(' => TokenKind::OpenParenthesis,
            ')' => TokenKind::CloseParenthesis,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Period,
            '#' => TokenKind::Hash,
            '*' => TokenKind::Asterisk,
            '!' => TokenKind::ExclamationMark,
            '@' => TokenKind::AtSign,
            '|' => TokenKind::Pipe,
            '=' => TokenKind::Equals,
            '<' => TokenKind::LessThan,
            '>' => TokenKind::GreaterThan,
            _ => return None,
        };
        Some((kind, 1))
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.emit()
    }
}

/// Check if a character can start an identifier.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Byte length of the identifier at the start of `s`.
fn identifier_len(s: &str) -> usize {
    s.find(|c: char| !is_identifier_char(c)).unwrap_or(s.len())
}
