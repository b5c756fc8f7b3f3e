//! Whitespace normalization over a UVSS syntax tree.
//!
//! Layout is decided in one read-only pass over the tokens, then applied by a
//! [`SyntaxRewriter`] that rebuilds each token with its new trivia. Comments
//! and skipped tokens are kept; all other whitespace is replaced.

use std::collections::HashMap;

use tracing::{debug, trace};
use uvss_cst::{NodeId, SyntaxKind, SyntaxNode, SyntaxRewriter, SyntaxTree};

use crate::NormalizeOptions;

use SyntaxKind::*;

/// Normalize the whitespace of the sub-tree rooted at `node`.
///
/// Returns the root of the rewritten sub-tree. The original nodes stay in the
/// arena; the ones whose children moved are marked stale.
pub fn normalize_whitespace(
    tree: &mut SyntaxTree,
    node: NodeId,
    options: &NormalizeOptions,
) -> NodeId {
    let plan = plan_layout(tree.syntax(node));
    debug!(tokens = plan.len(), "normalizing whitespace");
    let mut normalizer = Normalizer { plan, options };
    normalizer.visit(tree, node).unwrap_or(node)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    /// Existing comment or skipped-tokens trivia
    Keep(NodeId),
    Space,
    Indent(usize),
    LineBreak,
}

#[derive(Debug, Default)]
struct TokenLayout {
    leading: Vec<Piece>,
    trailing: Vec<Piece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gap {
    None,
    Space,
    Lines(usize),
}

struct TokenInfo<'t> {
    node: SyntaxNode<'t>,
    kind: SyntaxKind,
    /// Kind of the nearest enclosing node that is not a list
    parent: SyntaxKind,
    selector_part: Option<NodeId>,
    indent: usize,
}

impl<'t> TokenInfo<'t> {
    fn new(node: SyntaxNode<'t>) -> Self {
        let kind = node.kind();
        let parent = node
            .ancestors()
            .find(|ancestor| !ancestor.is_list())
            .map_or(DOCUMENT, |ancestor| ancestor.kind());
        let selector_part = node
            .ancestors()
            .find(|ancestor| ancestor.kind() == SELECTOR_PART)
            .map(|ancestor| ancestor.id());
        let blocks = node
            .ancestors()
            .filter(|ancestor| ancestor.kind() == BLOCK)
            .count();
        let own_brace = parent == BLOCK
            && matches!(kind, OPEN_CURLY_BRACE_TOKEN | CLOSE_CURLY_BRACE_TOKEN);
        Self {
            node,
            kind,
            parent,
            selector_part,
            indent: blocks.saturating_sub(usize::from(own_brace)),
        }
    }

    fn is_block_brace(&self) -> bool {
        self.parent == BLOCK
            && matches!(self.kind, OPEN_CURLY_BRACE_TOKEN | CLOSE_CURLY_BRACE_TOKEN)
    }

    fn is_qualifying_period(&self) -> bool {
        self.kind == PERIOD_TOKEN && matches!(self.parent, PROPERTY_NAME | EVENT_NAME)
    }

    fn has_leading_comments(&self) -> bool {
        self.node
            .leading_trivia()
            .any(|trivia| trivia.kind().is_comment_trivia())
    }

    fn has_trailing_line_comment(&self) -> bool {
        self.node
            .trailing_trivia()
            .any(|trivia| trivia.kind() == SINGLE_LINE_COMMENT_TRIVIA)
    }
}

fn plan_layout(root: SyntaxNode<'_>) -> HashMap<NodeId, TokenLayout> {
    let tokens: Vec<TokenInfo<'_>> = root
        .tokens()
        .filter(|token| !token.is_missing())
        .map(TokenInfo::new)
        .collect();
    let item_breaks = item_breaks(root);

    let mut plan = HashMap::with_capacity(tokens.len());
    let mut line_start = true;
    for (index, token) in tokens.iter().enumerate() {
        let gap = tokens
            .get(index + 1)
            .map(|next| gap_between(token, next, &item_breaks));
        trace!(kind = ?token.kind, ?gap, "token layout");
        let layout = TokenLayout {
            leading: leading_pieces(token, line_start),
            trailing: trailing_pieces(token, gap),
        };
        line_start = matches!(gap, Some(Gap::Lines(lines)) if lines > 0);
        plan.insert(token.node.id(), layout);
    }
    plan
}

/// Line breaks owed after the last token of each document or block item.
fn item_breaks(root: SyntaxNode<'_>) -> HashMap<NodeId, usize> {
    let mut breaks = HashMap::new();
    for node in std::iter::once(root).chain(root.descendant_nodes(None, false)) {
        let Some(list) = node.parent().filter(|parent| parent.is_list()) else {
            continue;
        };
        let lines = match list.parent().map(|owner| owner.kind()) {
            Some(DOCUMENT) => 2,
            Some(BLOCK) => 1,
            _ => continue,
        };
        if let Some(last) = node.tokens().filter(|token| !token.is_missing()).last() {
            let entry = breaks.entry(last.id()).or_insert(0);
            *entry = lines.max(*entry);
        }
    }
    breaks
}

fn gap_between(
    prev: &TokenInfo<'_>,
    next: &TokenInfo<'_>,
    item_breaks: &HashMap<NodeId, usize>,
) -> Gap {
    let mut lines = item_breaks.get(&prev.node.id()).copied().unwrap_or(0);
    if prev.kind == SEMICOLON_TOKEN || prev.is_block_brace() {
        lines = lines.max(1);
    }
    // A closing block brace always starts its own line, after no blank line.
    if next.kind == CLOSE_CURLY_BRACE_TOKEN && next.parent == BLOCK {
        lines = 1;
    }
    if next.kind == END_OF_FILE_TOKEN && !next.has_leading_comments() {
        lines = 1;
    }
    if prev.has_trailing_line_comment() || next.has_leading_comments() {
        lines = lines.max(1);
    }
    if lines > 0 {
        Gap::Lines(lines)
    } else if adjacent(prev, next) {
        Gap::None
    } else {
        Gap::Space
    }
}

/// Whether two tokens on the same line are written without a space.
fn adjacent(prev: &TokenInfo<'_>, next: &TokenInfo<'_>) -> bool {
    if prev.kind == SPACE_TOKEN || next.kind == SPACE_TOKEN {
        return true;
    }
    if matches!(prev.kind, AT_SIGN_TOKEN | OPEN_PARENTHESES_TOKEN | OPEN_BRACKET_TOKEN) {
        return true;
    }
    if matches!(
        next.kind,
        SEMICOLON_TOKEN | COMMA_TOKEN | COLON_TOKEN | CLOSE_PARENTHESES_TOKEN | CLOSE_BRACKET_TOKEN
    ) {
        return true;
    }
    if prev.is_qualifying_period() || next.is_qualifying_period() {
        return true;
    }
    if next.kind == OPEN_BRACKET_TOKEN && next.parent == NAVIGATION_EXPRESSION_INDEXER {
        return true;
    }
    prev.selector_part.is_some() && prev.selector_part == next.selector_part
}

fn leading_pieces(token: &TokenInfo<'_>, line_start: bool) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut at_line_start = line_start;
    for trivia in token.node.leading_trivia() {
        let kind = trivia.kind();
        if kind.is_whitespace_trivia() {
            continue;
        }
        if at_line_start {
            pieces.push(Piece::Indent(token.indent));
        }
        pieces.push(Piece::Keep(trivia.id()));
        // Skipped tokens carry their own whitespace and stay on the token's line.
        at_line_start = kind.is_comment_trivia();
        if at_line_start {
            pieces.push(Piece::LineBreak);
        }
    }
    if at_line_start {
        pieces.push(Piece::Indent(token.indent));
    }
    pieces
}

fn trailing_pieces(token: &TokenInfo<'_>, gap: Option<Gap>) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for trivia in token.node.trailing_trivia() {
        let kind = trivia.kind();
        if kind.is_comment_trivia() {
            // A descendant combinator already is the space before its comment.
            if token.kind != SPACE_TOKEN {
                pieces.push(Piece::Space);
            }
            pieces.push(Piece::Keep(trivia.id()));
        } else if kind.is_structured_trivia() {
            pieces.push(Piece::Keep(trivia.id()));
        }
    }
    match gap {
        Some(Gap::Space) => pieces.push(Piece::Space),
        Some(Gap::Lines(lines)) => pieces.extend(std::iter::repeat_n(Piece::LineBreak, lines)),
        Some(Gap::None) | None => {}
    }
    pieces
}

struct Normalizer<'o> {
    plan: HashMap<NodeId, TokenLayout>,
    options: &'o NormalizeOptions,
}

impl Normalizer<'_> {
    /// Kind and text of the trivia a piece stands for.
    fn describe(&self, piece: Piece) -> Option<(SyntaxKind, String)> {
        match piece {
            Piece::Keep(_) => None,
            Piece::Space => Some((WHITESPACE_TRIVIA, " ".to_string())),
            Piece::Indent(depth) => Some((WHITESPACE_TRIVIA, self.options.indent.repeat(depth))),
            Piece::LineBreak => Some((END_OF_LINE_TRIVIA, self.options.end_of_line.to_string())),
        }
    }

    fn pieces_match(&self, tree: &SyntaxTree, pieces: &[Piece], existing: &[NodeId]) -> bool {
        let pieces: Vec<Piece> = pieces
            .iter()
            .copied()
            .filter(|&piece| !self.is_empty(piece))
            .collect();
        pieces.len() == existing.len()
            && pieces.iter().zip(existing).all(|(&piece, &trivia)| match piece {
                Piece::Keep(id) => id == trivia,
                _ => self
                    .describe(piece)
                    .is_some_and(|(kind, text)| tree.kind(trivia) == kind && tree.text(trivia) == text),
            })
    }

    fn is_empty(&self, piece: Piece) -> bool {
        matches!(piece, Piece::Indent(0))
            || (matches!(piece, Piece::Indent(_)) && self.options.indent.is_empty())
    }

    fn build(&self, tree: &mut SyntaxTree, pieces: &[Piece]) -> Vec<NodeId> {
        pieces
            .iter()
            .filter(|&&piece| !self.is_empty(piece))
            .filter_map(|&piece| match piece {
                Piece::Keep(trivia) => Some(trivia),
                _ => self
                    .describe(piece)
                    .map(|(kind, text)| tree.trivia(kind, text)),
            })
            .collect()
    }
}

impl SyntaxRewriter for Normalizer<'_> {
    fn visit_token(&mut self, tree: &mut SyntaxTree, node: NodeId) -> Option<NodeId> {
        // Missing tokens and tokens inside skipped trivia have no layout.
        let Some(layout) = self.plan.remove(&node) else {
            return Some(node);
        };
        let is_space = tree.kind(node) == SPACE_TOKEN;
        let unchanged = self.pieces_match(tree, &layout.leading, &tree.leading_trivia(node))
            && self.pieces_match(tree, &layout.trailing, &tree.trailing_trivia(node))
            && (!is_space || tree.text(node) == " ");
        if unchanged {
            return Some(node);
        }
        let leading = self.build(tree, &layout.leading);
        let trailing = self.build(tree, &layout.trailing);
        if is_space {
            return Some(tree.token(SPACE_TOKEN, " ", leading, trailing));
        }
        Some(tree.with_trivia(node, leading, trailing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize_source, try_normalize_source};
    use uvss_cst::parse;

    fn normalize(source: &str) -> String {
        normalize_source(source, &NormalizeOptions::default())
    }

    fn token_kinds(source: &str) -> Vec<SyntaxKind> {
        parse(source)
            .root()
            .tokens()
            .filter(|token| !token.is_missing())
            .map(|token| token.kind())
            .collect()
    }

    #[test]
    fn selectors_and_rules() {
        let output = normalize("Button>#ok.big:hover,.x{Width:100;Grid.Row :  1   !important;}");
        insta::assert_snapshot!(output.trim_end(), @r"
        Button > #ok.big:hover, .x {
            Width: 100;
            Grid.Row: 1 !important;
        }
        ");
    }

    #[test]
    fn nested_blocks_are_indented() {
        let output = normalize(
            "@Fade   loop{target Button(#ok){animation Opacity{keyframe 0{0}keyframe 250 ease-in{ 1 }}}}",
        );
        insta::assert_snapshot!(output.trim_end(), @r"
        @Fade loop {
            target Button (#ok) {
                animation Opacity {
                    keyframe 0 { 0 }
                    keyframe 250 ease-in { 1 }
                }
            }
        }
        ");
    }

    #[test]
    fn comments_are_kept() {
        let output = normalize("// header\na{b:c; // trailing\n/* lead */ d:e;}\n\n\n\nf{}");
        insta::assert_snapshot!(output.trim_end(), @r"
        // header
        a {
            b: c; // trailing
            /* lead */
            d: e;
        }

        f {
        }
        ");
    }

    #[test]
    fn combinators_navigation_and_directives() {
        let output = normalize(
            "$culture{en-US}\nGrid   Button  |Content [ 0 ]as Label,a\n>>b >?c{}",
        );
        assert_eq!(
            output,
            "$culture { en-US }\n\nGrid Button | Content[0] as Label, a >> b >? c {\n}\n"
        );
    }

    #[test]
    fn comment_inside_descendant_combinator() {
        let output = normalize("#a   /* c */#b{}");
        assert_eq!(output, "#a /* c */#b {\n}\n");
        assert_eq!(normalize(&output), output);
    }

    #[test]
    fn triggers() {
        let output = normalize(
            "a{trigger event Click(handled,set-handled){set Opacity{0}play-sfx{ Click }}trigger property IsEnabled<>{true}{set Foreground{Red}}transition(Opacity,Normal):0:0:1;}",
        );
        insta::assert_snapshot!(output.trim_end(), @r"
        a {
            trigger event Click (handled, set-handled) {
                set Opacity { 0 }
                play-sfx { Click }
            }
            trigger property IsEnabled <> { true } {
                set Foreground { Red }
            }
            transition (Opacity, Normal): 0:0:1;
        }
        ");
    }

    #[test]
    fn custom_indent_and_line_breaks() {
        let options = NormalizeOptions::new().indent("  ").end_of_line("\r\n");
        let output = normalize_source("a{b:c;}", &options);
        assert_eq!(output, "a {\r\n  b: c;\r\n}\r\n");
    }

    #[test]
    fn empty_and_comment_only_documents() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\n "), "");
        assert_eq!(normalize("\n// only\n\n"), "// only\n");
    }

    #[test]
    fn source_with_errors_is_returned_unchanged() {
        let source = "a { b: ";
        assert_eq!(normalize(source), source);
    }

    #[test]
    fn source_with_errors_reports_diagnostics() {
        let diagnostics = try_normalize_source("a { b: c }", &NormalizeOptions::default())
            .unwrap_err();
        let messages: Vec<_> = diagnostics.iter().map(|d| d.to_string()).collect();
        assert_eq!(messages, ["1:10: expected ';'"]);

        let output = try_normalize_source("a{b:c;}", &NormalizeOptions::default()).unwrap();
        assert_eq!(output, "a {\n    b: c;\n}\n");
    }

    #[test]
    fn trees_with_errors_still_normalize() {
        let (mut tree, root) = parse("a {b:c}").into_parts();
        let root = normalize_whitespace(&mut tree, root, &NormalizeOptions::default());
        assert_eq!(tree.to_full_string(root), "a {\n    b: c\n}\n");
    }

    #[test]
    fn normalizing_twice_keeps_ids() {
        let (mut tree, root) = parse("a {\n    b: c;\n}\n").into_parts();
        let options = NormalizeOptions::default();
        let first = normalize_whitespace(&mut tree, root, &options);
        assert_eq!(first, root);
        assert_eq!(normalize_whitespace(&mut tree, first, &options), first);
    }

    #[test]
    fn token_sequence_is_preserved() {
        let source = "Grid  Button>.x ,#y{ Grid.Row:1 2 3 !important ; trigger event A.B(handled){set C{4}} }";
        let output = normalize(source);
        assert_eq!(token_kinds(&output), token_kinds(source));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const SPACES: &[&str] = &[" ", "  ", "\n", " \n\t", "\r\n"];
        const OPTIONAL_SPACES: &[&str] = &["", " ", "\n"];
        const COMBINATORS: &[&str] = &[" ", " > ", ">", " >> ", " >? "];
        const VALUES: &[&str] = &["1", "Red", "0 0 10 10", "#FF00FF", "auto"];
        const COMMENTS: &[&str] = &["", "/* c */\n", "// note\n"];

        fn name() -> impl Strategy<Value = String> {
            prop::string::string_regex("[A-Z][a-z]{0,5}").unwrap()
        }

        fn selector_part() -> impl Strategy<Value = String> {
            (name(), prop::option::of(name())).prop_map(|(element, class)| match class {
                Some(class) => format!("{element}.{class}"),
                None => element,
            })
        }

        fn selector() -> impl Strategy<Value = String> {
            (
                selector_part(),
                prop::collection::vec(
                    (prop::sample::select(COMBINATORS), selector_part()),
                    0..3,
                ),
            )
                .prop_map(|(first, rest)| {
                    rest.into_iter().fold(first, |mut out, (combinator, part)| {
                        out.push_str(combinator);
                        out.push_str(&part);
                        out
                    })
                })
        }

        fn rule() -> impl Strategy<Value = String> {
            (
                name(),
                prop::sample::select(OPTIONAL_SPACES),
                prop::sample::select(OPTIONAL_SPACES),
                prop::sample::select(VALUES),
                prop::sample::select(OPTIONAL_SPACES),
                prop::sample::select(COMMENTS),
            )
                .prop_map(|(property, w1, w2, value, w3, comment)| {
                    format!("{comment}{property}{w1}:{w2}{value}{w3};")
                })
        }

        fn rule_set() -> impl Strategy<Value = String> {
            (
                selector(),
                prop::sample::select(OPTIONAL_SPACES),
                prop::collection::vec((prop::sample::select(SPACES), rule()), 0..4),
                prop::sample::select(SPACES),
            )
                .prop_map(|(selector, w1, rules, w2)| {
                    let body: String = rules.into_iter().map(|(w, rule)| format!("{w}{rule}")).collect();
                    format!("{selector}{w1}{{{body}{w2}}}")
                })
        }

        fn document() -> impl Strategy<Value = String> {
            prop::collection::vec(
                (prop::sample::select(COMMENTS), rule_set(), prop::sample::select(SPACES)),
                0..4,
            )
            .prop_map(|items| {
                items
                    .into_iter()
                    .map(|(comment, rule_set, w)| format!("{comment}{rule_set}{w}"))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn normalization_is_idempotent(source in document()) {
                let once = normalize(&source);
                let twice = normalize(&once);
                prop_assert_eq!(&once, &twice);
            }

            #[test]
            fn normalization_keeps_the_parse(source in document()) {
                prop_assert!(parse(&source).is_ok());
                let output = normalize(&source);
                prop_assert!(parse(&output).is_ok());
                prop_assert_eq!(token_kinds(&output), token_kinds(&source));
            }
        }
    }
}
