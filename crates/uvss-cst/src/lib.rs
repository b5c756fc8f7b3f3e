//! Lossless Concrete Syntax Tree for the UVSS styling language.
//!
//! Every byte of the source, whitespace and comments included, is kept in the
//! tree: tokens carry their surrounding trivia, and input the parser could not
//! place is preserved as skipped-tokens trivia. Printing the root reproduces
//! the source exactly.
//!
//! Nodes live in a [`SyntaxTree`] arena and are read through cheap
//! [`SyntaxNode`] handles. The tree is immutable apart from token trivia,
//! which [`SyntaxTree::change_trivia`] replaces in place.
//!
//! # Example
//!
//! ```
//! use uvss_cst::{parse, ast::{AstNode, Document}};
//!
//! let source = "Button { Width: 100; }\n";
//!
//! let parsed = parse(source);
//! assert!(parsed.is_ok());
//!
//! let doc = Document::cast(parsed.root()).unwrap();
//! for rule_set in doc.rule_sets() {
//!     for rule in rule_set.rules() {
//!         println!("{:?} = {:?}", rule.property_name_text(), rule.value_text());
//!     }
//! }
//!
//! // Roundtrip: source can be exactly reconstructed
//! assert_eq!(parsed.root().to_string(), source);
//! ```
//!
//! # Diagnostics
//!
//! ```
//! use uvss_cst::parse;
//!
//! let parsed = parse("#foo { ");
//! let diagnostics = parsed.diagnostics();
//! assert_eq!(diagnostics[0].to_string(), "1:8: expected '}'");
//! ```

pub mod ast;
pub mod diagnostics;
pub mod list;
pub mod parser;
pub mod rewriter;
pub mod serialize;
pub mod syntax_kind;
pub mod tree;
pub mod visitor;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use list::{ListShape, SeparatedSyntaxList, SyntaxList};
pub use parser::{Parse, ParseOptions, parse, parse_with_options};
pub use rewriter::SyntaxRewriter;
pub use serialize::{FormatVersion, SerializeError, deserialize, serialize};
pub use syntax_kind::SyntaxKind;
pub use tree::{NodeId, SlotError, SyntaxNode, SyntaxTree};
pub use visitor::SyntaxVisitor;

pub use uvss_tokenizer::{Location, Span};
