//! A tokenizer for UVSS

mod span;
pub use span::{Location, Span};

mod token;
pub use token::{KEYWORDS, Token, TokenKind};

mod tokenizer;
pub use tokenizer::{Tokenizer, TokenizerOptions, tokenize};
