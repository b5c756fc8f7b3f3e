//! Whitespace normalization for UVSS syntax trees.
//!
//! ```
//! use uvss_format::{NormalizeOptions, normalize_source};
//!
//! let output = normalize_source("Button{Width:100;}", &NormalizeOptions::default());
//! assert_eq!(output, "Button {\n    Width: 100;\n}\n");
//! ```

mod normalize;
mod options;

pub use normalize::normalize_whitespace;
pub use options::NormalizeOptions;

use uvss_cst::Diagnostic;

/// Normalize a UVSS document from source text.
///
/// Parses the source, normalizes the tree and returns its full text.
/// Returns the original source if parsing fails.
pub fn normalize_source(source: &str, options: &NormalizeOptions) -> String {
    try_normalize_source(source, options).unwrap_or_else(|_| source.to_string())
}

/// Like [`normalize_source`], but hands back the parse diagnostics instead
/// of the unchanged source when the document has errors.
pub fn try_normalize_source(
    source: &str,
    options: &NormalizeOptions,
) -> Result<String, Vec<Diagnostic>> {
    let parsed = uvss_cst::parse(source);
    if !parsed.is_ok() {
        return Err(parsed.diagnostics());
    }
    let (mut tree, root) = parsed.into_parts();
    let root = normalize_whitespace(&mut tree, root, options);
    Ok(tree.to_full_string(root))
}
