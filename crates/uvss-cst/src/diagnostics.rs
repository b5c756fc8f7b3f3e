//! Syntax diagnostics derived from a parsed tree, rendered with ariadne.

use std::fmt;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use uvss_tokenizer::{Location, Span};

use crate::{SyntaxKind, SyntaxNode};

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The parser inserted a placeholder for an absent construct.
    Expected(SyntaxKind),
    /// The parser skipped over input it could not place.
    Unexpected,
}

/// A syntax error with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Byte range; empty for missing constructs.
    pub span: Span,
    /// Line and column of `span.start`.
    pub location: Location,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        match self.kind {
            DiagnosticKind::Expected(kind) => format!("expected {}", kind.describe()),
            DiagnosticKind::Unexpected => "unexpected input".to_string(),
        }
    }

    fn label(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::Expected(_) => "expected here",
            DiagnosticKind::Unexpected => "skipped",
        }
    }

    /// Render this diagnostic with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write the report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range: std::ops::Range<usize> = self.span.into();
        let report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_config(ariadne_config())
            .with_message(self.message())
            .with_label(
                Label::new((filename, range))
                    .with_message(self.label())
                    .with_color(Color::Red),
            );
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.location.line,
            self.location.column,
            self.message()
        )
    }
}

fn ariadne_config() -> Config {
    let config = Config::default().with_index_type(IndexType::Byte);
    if std::env::var("NO_COLOR").is_ok() {
        config.with_color(false)
    } else {
        config
    }
}

/// One diagnostic per outermost missing node and per skipped-tokens trivia,
/// in source order.
pub(crate) fn collect(root: SyntaxNode<'_>, tab_width: u32) -> Vec<Diagnostic> {
    let not_missing = |node: SyntaxNode<'_>| !node.is_missing();
    let mut found: Vec<(DiagnosticKind, Span)> = root
        .descendant_nodes(Some(&not_missing), true)
        .filter_map(|node| {
            if node.is_missing() {
                Some((DiagnosticKind::Expected(node.kind()), node.span()))
            } else if node.kind() == SyntaxKind::SKIPPED_TOKENS_TRIVIA {
                Some((DiagnosticKind::Unexpected, node.span()))
            } else {
                None
            }
        })
        .collect();
    found.sort_by_key(|(_, span)| span.start);

    let text = root.to_full_string();
    let mut location = Location::START;
    let mut offset = 0usize;
    found
        .into_iter()
        .map(|(kind, span)| {
            let start = span.start as usize;
            location = location.advance(&text[offset..start], tab_width);
            offset = start;
            Diagnostic {
                kind,
                span,
                location,
            }
        })
        .collect()
}
