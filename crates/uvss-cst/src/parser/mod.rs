//! Recursive-descent parser producing a lossless syntax tree.
//!
//! The lexer output is realized up front into syntax tokens with their trivia
//! attached. The parser then walks that token vector by position: `accept_*`
//! functions return `None` without consuming anything when their construct is
//! absent, `expect_*` functions fall back to a missing placeholder.

use std::mem;

use tracing::{debug, trace};
use uvss_tokenizer::{Span, TokenKind, Tokenizer, TokenizerOptions};

use crate::diagnostics::{self, Diagnostic};
use crate::syntax_kind::{COMPARISON_OPERATORS, EXPLICIT_COMBINATORS};
use crate::{NodeId, SyntaxKind, SyntaxNode, SyntaxTree};

use SyntaxKind::*;

#[cfg(test)]
mod tests;

/// Options for [`parse_with_options`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Columns a tab advances, used for line/column locations.
    pub tab_width: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { tab_width: 4 }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_width(mut self, width: u32) -> Self {
        self.tab_width = width;
        self
    }
}

/// A parsed UVSS document.
#[derive(Debug)]
pub struct Parse {
    tree: SyntaxTree,
    root: NodeId,
    tab_width: u32,
}

impl Parse {
    /// The `DOCUMENT` node.
    pub fn root(&self) -> SyntaxNode<'_> {
        self.tree.syntax(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Give up the arena, e.g. to rewrite it.
    pub fn into_parts(self) -> (SyntaxTree, NodeId) {
        (self.tree, self.root)
    }

    /// Outermost placeholders the parser inserted for absent syntax.
    pub fn missing_nodes(&self) -> Vec<SyntaxNode<'_>> {
        let not_missing = |node: SyntaxNode<'_>| !node.is_missing();
        self.root()
            .descendant_nodes(Some(&not_missing), false)
            .filter(|node| node.is_missing())
            .collect()
    }

    /// Syntax errors: every missing node and every run of skipped tokens.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        diagnostics::collect(self.root(), self.tab_width)
    }

    /// Whether the source parsed without any recovery.
    pub fn is_ok(&self) -> bool {
        self.missing_nodes().is_empty()
            && !self
                .root()
                .descendant_nodes(None, true)
                .any(|node| node.kind() == SKIPPED_TOKENS_TRIVIA)
    }
}

/// Parse UVSS source into a syntax tree.
pub fn parse(source: &str) -> Parse {
    parse_with_options(source, &ParseOptions::default())
}

/// Parse UVSS source with explicit options.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Parse {
    let mut parser = Parser::new(source, options);
    let root = parser.parse_document();
    Parse {
        tree: parser.tree,
        root,
        tab_width: options.tab_width,
    }
}

/// The constructs a block may contain, by the owner of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    /// Rules, triggers and transitions.
    RuleSet,
    /// Trigger actions.
    Trigger,
    /// Storyboard targets.
    Storyboard,
    /// Animations.
    Target,
    /// Keyframes.
    Animation,
}

const SELECTOR_PART_START: &[SyntaxKind] = &[
    HASH_TOKEN,
    PERIOD_TOKEN,
    ASTERISK_TOKEN,
    IDENTIFIER_TOKEN,
    COLON_TOKEN,
];

struct Parser<'src> {
    source: &'src str,
    tree: SyntaxTree,
    /// Every syntax token, ending with `END_OF_FILE_TOKEN`.
    tokens: Vec<NodeId>,
    /// Source range of each token's text.
    spans: Vec<Span>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, options: &ParseOptions) -> Self {
        let mut tree = SyntaxTree::new();
        let mut tokens = Vec::new();
        let mut spans = Vec::new();

        let options = TokenizerOptions::new().tab_width(options.tab_width);
        let mut lexer = Tokenizer::with_options(source, options).peekable();
        let mut leading = Vec::new();
        while let Some(token) = lexer.next() {
            let kind = SyntaxKind::from_token(&token);
            if token.kind.is_trivia() {
                leading.push(tree.trivia(kind, token.text));
                continue;
            }

            // Trailing trivia runs up to and including the first line break.
            let mut trailing = Vec::new();
            while let Some(trivia) = lexer.next_if(|t| t.kind.is_trivia()) {
                trailing.push(tree.trivia(SyntaxKind::from_token(&trivia), trivia.text));
                if trivia.kind == TokenKind::EndOfLine {
                    break;
                }
            }

            tokens.push(tree.token(kind, token.text, mem::take(&mut leading), trailing));
            spans.push(token.span);
        }
        tokens.push(tree.token(END_OF_FILE_TOKEN, "", leading, Vec::new()));
        spans.push(Span::at(source.len() as u32, 0));

        Self {
            source,
            tree,
            tokens,
            spans,
            pos: 0,
        }
    }

    // ========== TOKEN CURSOR ==========

    fn peek_kind_at(&self, offset: usize) -> SyntaxKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tree.kind(self.tokens[index])
    }

    fn peek_kind(&self) -> SyntaxKind {
        self.peek_kind_at(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.peek_kind())
    }

    fn at_end(&self) -> bool {
        self.at(END_OF_FILE_TOKEN)
    }

    /// Consume the current token. The end-of-file token is never consumed.
    fn bump(&mut self) -> NodeId {
        let token = self.tokens[self.pos];
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn accept_token(&mut self, kind: SyntaxKind) -> Option<NodeId> {
        self.at(kind).then(|| self.bump())
    }

    fn accept_token_any(&mut self, kinds: &[SyntaxKind]) -> Option<NodeId> {
        self.at_any(kinds).then(|| self.bump())
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> NodeId {
        self.expect_token_any(&[kind])
    }

    fn expect_token_any(&mut self, kinds: &[SyntaxKind]) -> NodeId {
        match self.accept_token_any(kinds) {
            Some(token) => token,
            None => {
                debug!(expected = ?kinds[0], found = ?self.peek_kind(), "inserting missing token");
                self.tree.missing_token(kinds[0])
            }
        }
    }

    fn missing(&mut self, kind: SyntaxKind) -> NodeId {
        debug!(?kind, found = ?self.peek_kind(), "inserting missing node");
        if kind.is_token() {
            self.tree.missing_token(kind)
        } else {
            self.tree.missing_node(kind)
        }
    }

    /// Whether the previous and the current token touch, with no trivia between.
    fn adjacent(&self) -> bool {
        let Some(previous) = self.pos.checked_sub(1).map(|index| self.tokens[index]) else {
            return false;
        };
        let current = self.tokens[self.pos];
        self.tree.trailing_slot(previous).is_none() && self.tree.leading_slot(current).is_none()
    }

    /// `item (',' item)*`; an item missing after a comma becomes a placeholder.
    fn accept_separated_list(
        &mut self,
        mut accept: impl FnMut(&mut Self) -> Option<NodeId>,
        element: SyntaxKind,
    ) -> Option<NodeId> {
        let mut children = vec![accept(self)?];
        while let Some(comma) = self.accept_token(COMMA_TOKEN) {
            children.push(comma);
            let item = match accept(self) {
                Some(item) => item,
                None => self.missing(element),
            };
            children.push(item);
        }
        self.tree.separated_list(children)
    }

    /// Wrap tokens until `stop` (or end of file) into skipped-tokens trivia on
    /// the next token. At least one token is skipped.
    fn skip_tokens(&mut self, stop: impl Fn(&Self) -> bool) {
        let mut skipped = vec![self.bump()];
        while !self.at_end() && !stop(&*self) {
            skipped.push(self.bump());
        }
        debug!(count = skipped.len(), "skipping unexpected tokens");

        let trivia = self.tree.skipped_tokens_trivia(skipped);
        let next = self.tokens[self.pos];
        let mut leading = vec![trivia];
        leading.extend(self.tree.leading_trivia(next));
        self.tree.change_leading_trivia(next, leading);
    }

    /// Replace the tokens in `start..end` by one token of `kind` whose text is
    /// the exact source they cover.
    fn merge_tokens(&mut self, kind: SyntaxKind, start: usize, end: usize) -> NodeId {
        let first = self.tokens[start];
        let last = self.tokens[end - 1];
        let text_range = self.spans[start].cover(self.spans[end - 1]);
        let text = text_range.slice(self.source);

        let leading = self.tree.leading_trivia(first);
        let trailing = self.tree.trailing_trivia(last);
        self.tree.change_trivia(first, Vec::new(), Vec::new());
        self.tree.change_trivia(last, Vec::new(), Vec::new());
        self.tree.token(kind, text, leading, trailing)
    }

    // ========== DOCUMENT ==========

    fn parse_document(&mut self) -> NodeId {
        let mut content = Vec::new();
        while !self.at_end() {
            match self.accept_top_level() {
                Some(item) => content.push(item),
                None => self.skip_tokens(Self::at_top_level_start),
            }
        }
        let content = self.tree.list(content);

        let end_of_file = self.tokens[self.pos];
        assert_eq!(
            self.tree.kind(end_of_file),
            END_OF_FILE_TOKEN,
            "token stream must end with the end-of-file token"
        );
        self.tree.node(DOCUMENT, vec![content, Some(end_of_file)])
    }

    fn at_top_level_start(&self) -> bool {
        self.at_any(&[AT_SIGN_TOKEN, DIRECTIVE_TOKEN]) || self.at_any(SELECTOR_PART_START)
    }

    fn accept_top_level(&mut self) -> Option<NodeId> {
        trace!(kind = ?self.peek_kind(), pos = self.pos, "top level");
        match self.peek_kind() {
            AT_SIGN_TOKEN => Some(self.parse_storyboard()),
            DIRECTIVE_TOKEN => Some(self.parse_directive()),
            _ => self.accept_rule_set(),
        }
    }

    fn parse_directive(&mut self) -> NodeId {
        let directive = self.bump();
        if self.tree.text(directive) == "$culture" {
            let value = self.expect_property_value_with_braces();
            self.tree
                .node(CULTURE_DIRECTIVE, vec![Some(directive), Some(value)])
        } else {
            let value = self.accept_property_value_with_braces();
            self.tree.node(UNKNOWN_DIRECTIVE, vec![Some(directive), value])
        }
    }

    fn accept_rule_set(&mut self) -> Option<NodeId> {
        let selectors = self.accept_separated_list(
            Self::accept_selector_with_navigation_expression,
            SELECTOR_WITH_NAVIGATION_EXPRESSION,
        )?;
        let body = self.expect_block(BlockKind::RuleSet);
        Some(self.tree.node(RULE_SET, vec![Some(selectors), Some(body)]))
    }

    // ========== SELECTORS ==========

    fn accept_selector_with_navigation_expression(&mut self) -> Option<NodeId> {
        let selector = self.accept_selector()?;
        let navigation = self.accept_navigation_expression();
        Some(self.tree.node(
            SELECTOR_WITH_NAVIGATION_EXPRESSION,
            vec![Some(selector), navigation],
        ))
    }

    fn accept_selector(&mut self) -> Option<NodeId> {
        let mut components = vec![self.accept_selector_part()?];
        loop {
            let combinator = match self.accept_token_any(EXPLICIT_COMBINATORS) {
                Some(combinator) => combinator,
                None => match self.accept_descendant_combinator() {
                    Some(space) => space,
                    None => break,
                },
            };
            components.push(combinator);
            let part = match self.accept_selector_part() {
                Some(part) => part,
                None => self.missing(SELECTOR_PART),
            };
            components.push(part);
        }
        let components = self.tree.list(components);
        Some(self.tree.node(SELECTOR, vec![components]))
    }

    /// Turn the whitespace between two selector parts into a `SPACE_TOKEN`.
    ///
    /// The last whitespace run in the previous token's trailing trivia is cut
    /// out of that trivia and becomes the combinator's text. Comments after
    /// the run move to the combinator's trailing trivia, so `#a /* c */#b`
    /// is still two parts of one selector.
    fn accept_descendant_combinator(&mut self) -> Option<NodeId> {
        if !self.at_any(SELECTOR_PART_START) {
            return None;
        }
        let previous = self.tokens[self.pos.checked_sub(1)?];
        let trailing = self.tree.trailing_trivia(previous);
        let is_space = |tree: &SyntaxTree, trivia: NodeId| tree.kind(trivia).is_whitespace_trivia();
        let end = trailing
            .iter()
            .rposition(|&trivia| is_space(&self.tree, trivia))?
            + 1;
        let start = trailing[..end]
            .iter()
            .rposition(|&trivia| !is_space(&self.tree, trivia))
            .map_or(0, |index| index + 1);

        let text: String = trailing[start..end]
            .iter()
            .map(|&trivia| self.tree.text(trivia))
            .collect();
        let after = trailing[end..].to_vec();
        self.tree
            .change_trailing_trivia(previous, trailing[..start].to_vec());
        trace!(?text, "descendant combinator");
        Some(self.tree.token(SPACE_TOKEN, text, Vec::new(), after))
    }

    fn accept_selector_part(&mut self) -> Option<NodeId> {
        let mut sub_parts = Vec::new();
        while sub_parts.is_empty() || self.adjacent() {
            match self.accept_selector_sub_part() {
                Some(sub_part) => sub_parts.push(sub_part),
                None => break,
            }
        }
        let pseudo_class = if sub_parts.is_empty() || self.adjacent() {
            self.accept_pseudo_class()
        } else {
            None
        };
        if sub_parts.is_empty() && pseudo_class.is_none() {
            return None;
        }
        let sub_parts = self.tree.list(sub_parts);
        Some(self.tree.node(SELECTOR_PART, vec![sub_parts, pseudo_class]))
    }

    fn accept_selector_sub_part(&mut self) -> Option<NodeId> {
        const TEXT: &[SyntaxKind] = &[IDENTIFIER_TOKEN, ASTERISK_TOKEN];
        let leading = self.accept_token_any(&[HASH_TOKEN, PERIOD_TOKEN]);
        let text = match leading {
            Some(_) => self.expect_token_any(TEXT),
            None => self.accept_token_any(TEXT)?,
        };
        let trailing = if self.adjacent() {
            self.accept_token(EXCLAMATION_MARK_TOKEN)
        } else {
            None
        };
        Some(
            self.tree
                .node(SELECTOR_SUB_PART, vec![leading, Some(text), trailing]),
        )
    }

    fn accept_pseudo_class(&mut self) -> Option<NodeId> {
        if !self.at(COLON_TOKEN) || self.peek_kind_at(1) != IDENTIFIER_TOKEN {
            return None;
        }
        let colon = self.bump();
        let class_name = self.expect_identifier();
        Some(self.tree.node(PSEUDO_CLASS, vec![Some(colon), Some(class_name)]))
    }

    fn accept_selector_with_parentheses(&mut self) -> Option<NodeId> {
        let open = self.accept_token(OPEN_PARENTHESES_TOKEN)?;
        let selector = match self.accept_selector() {
            Some(selector) => selector,
            None => self.missing(SELECTOR),
        };
        let close = self.expect_token(CLOSE_PARENTHESES_TOKEN);
        Some(self.tree.node(
            SELECTOR_WITH_PARENTHESES,
            vec![Some(open), Some(selector), Some(close)],
        ))
    }

    fn accept_navigation_expression(&mut self) -> Option<NodeId> {
        let pipe = self.accept_token(PIPE_TOKEN)?;
        let property_name = self.expect_property_name();
        let indexer = self.accept_navigation_expression_indexer();
        let as_keyword = self.expect_token(AS_KEYWORD);
        let type_name = self.expect_identifier();
        Some(self.tree.node(
            NAVIGATION_EXPRESSION,
            vec![
                Some(pipe),
                Some(property_name),
                indexer,
                Some(as_keyword),
                Some(type_name),
            ],
        ))
    }

    fn accept_navigation_expression_indexer(&mut self) -> Option<NodeId> {
        let open = self.accept_token(OPEN_BRACKET_TOKEN)?;
        let number = self.expect_token(NUMBER_TOKEN);
        let close = self.expect_token(CLOSE_BRACKET_TOKEN);
        Some(self.tree.node(
            NAVIGATION_EXPRESSION_INDEXER,
            vec![Some(open), Some(number), Some(close)],
        ))
    }

    // ========== NAMES ==========

    fn accept_identifier(&mut self) -> Option<NodeId> {
        let token = self.accept_token(IDENTIFIER_TOKEN)?;
        Some(self.tree.node(IDENTIFIER, vec![Some(token)]))
    }

    fn expect_identifier(&mut self) -> NodeId {
        match self.accept_identifier() {
            Some(identifier) => identifier,
            None => self.missing(IDENTIFIER),
        }
    }

    /// `name` or `Owner.name`, as a `PROPERTY_NAME` or `EVENT_NAME`.
    fn accept_qualified_name(&mut self, kind: SyntaxKind) -> Option<NodeId> {
        let first = self.accept_identifier()?;
        let slots = match self.accept_token(PERIOD_TOKEN) {
            Some(period) => {
                let name = self.expect_identifier();
                vec![Some(first), Some(period), Some(name)]
            }
            None => vec![None, None, Some(first)],
        };
        Some(self.tree.node(kind, slots))
    }

    fn expect_property_name(&mut self) -> NodeId {
        match self.accept_qualified_name(PROPERTY_NAME) {
            Some(name) => name,
            None => self.missing(PROPERTY_NAME),
        }
    }

    // ========== BLOCKS ==========

    fn expect_block(&mut self, kind: BlockKind) -> NodeId {
        let Some(open) = self.accept_token(OPEN_CURLY_BRACE_TOKEN) else {
            return self.missing(BLOCK);
        };
        let mut content = Vec::new();
        while !self.at(CLOSE_CURLY_BRACE_TOKEN) && !self.at_end() {
            match self.accept_block_item(kind) {
                Some(item) => content.push(item),
                None => self.skip_tokens(|parser| {
                    parser.at(CLOSE_CURLY_BRACE_TOKEN) || parser.at_block_item_start(kind)
                }),
            }
        }
        let content = self.tree.list(content);
        let close = self.expect_token(CLOSE_CURLY_BRACE_TOKEN);
        self.tree.node(BLOCK, vec![Some(open), content, Some(close)])
    }

    fn block_item_starts(kind: BlockKind) -> &'static [SyntaxKind] {
        match kind {
            BlockKind::RuleSet => &[TRIGGER_KEYWORD, TRANSITION_KEYWORD, IDENTIFIER_TOKEN],
            BlockKind::Trigger => &[PLAY_STORYBOARD_KEYWORD, PLAY_SFX_KEYWORD, SET_KEYWORD],
            BlockKind::Storyboard => &[TARGET_KEYWORD],
            BlockKind::Target => &[ANIMATION_KEYWORD],
            BlockKind::Animation => &[KEYFRAME_KEYWORD],
        }
    }

    fn at_block_item_start(&self, kind: BlockKind) -> bool {
        self.at_any(Self::block_item_starts(kind))
    }

    fn accept_block_item(&mut self, kind: BlockKind) -> Option<NodeId> {
        if !self.at_block_item_start(kind) {
            return None;
        }
        trace!(block = ?kind, token = ?self.peek_kind(), pos = self.pos, "block item");
        let item = match self.peek_kind() {
            TRIGGER_KEYWORD if self.peek_kind_at(1) == PROPERTY_KEYWORD => {
                self.parse_property_trigger()
            }
            TRIGGER_KEYWORD => self.parse_event_trigger(),
            TRANSITION_KEYWORD => self.parse_transition(),
            IDENTIFIER_TOKEN => return self.accept_rule(),
            PLAY_STORYBOARD_KEYWORD => self.parse_play_storyboard_trigger_action(),
            PLAY_SFX_KEYWORD => self.parse_play_sfx_trigger_action(),
            SET_KEYWORD => self.parse_set_trigger_action(),
            TARGET_KEYWORD => self.parse_storyboard_target(),
            ANIMATION_KEYWORD => self.parse_animation(),
            KEYFRAME_KEYWORD => self.parse_animation_keyframe(),
            _ => return None,
        };
        Some(item)
    }

    // ========== PROPERTY VALUES ==========

    /// A raw value running up to `;`, `}`, `!important` or end of file.
    fn expect_property_value(&mut self) -> NodeId {
        let start = self.pos;
        while !self.at_any(&[
            SEMICOLON_TOKEN,
            CLOSE_CURLY_BRACE_TOKEN,
            IMPORTANT_KEYWORD,
            END_OF_FILE_TOKEN,
        ]) {
            self.pos += 1;
        }
        if start == self.pos {
            return self.missing(PROPERTY_VALUE);
        }
        let content = self.merge_tokens(PROPERTY_VALUE_TOKEN, start, self.pos);
        self.tree.node(PROPERTY_VALUE, vec![Some(content)])
    }

    /// `{ raw value }`, with nested braces balanced inside the value.
    fn accept_property_value_with_braces(&mut self) -> Option<NodeId> {
        let open = self.accept_token(OPEN_CURLY_BRACE_TOKEN)?;
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                END_OF_FILE_TOKEN => break,
                OPEN_CURLY_BRACE_TOKEN => depth += 1,
                CLOSE_CURLY_BRACE_TOKEN if depth == 0 => break,
                CLOSE_CURLY_BRACE_TOKEN => depth -= 1,
                _ => {}
            }
            self.pos += 1;
        }
        let content = if start == self.pos {
            self.missing(PROPERTY_VALUE_TOKEN)
        } else {
            self.merge_tokens(PROPERTY_VALUE_TOKEN, start, self.pos)
        };
        let close = self.expect_token(CLOSE_CURLY_BRACE_TOKEN);
        Some(self.tree.node(
            PROPERTY_VALUE_WITH_BRACES,
            vec![Some(open), Some(content), Some(close)],
        ))
    }

    fn expect_property_value_with_braces(&mut self) -> NodeId {
        match self.accept_property_value_with_braces() {
            Some(value) => value,
            None => self.missing(PROPERTY_VALUE_WITH_BRACES),
        }
    }

    // ========== RULE-SET BLOCK ITEMS ==========

    fn accept_rule(&mut self) -> Option<NodeId> {
        let property_name = self.accept_qualified_name(PROPERTY_NAME)?;
        let colon = self.expect_token(COLON_TOKEN);
        let value = self.expect_property_value();
        let qualifier = self.accept_token(IMPORTANT_KEYWORD);
        let semicolon = self.expect_token(SEMICOLON_TOKEN);
        Some(self.tree.node(
            RULE,
            vec![
                Some(property_name),
                Some(colon),
                Some(value),
                qualifier,
                Some(semicolon),
            ],
        ))
    }

    fn parse_event_trigger(&mut self) -> NodeId {
        let trigger_keyword = self.bump();
        let event_keyword = self.expect_token(EVENT_KEYWORD);
        let event_name = match self.accept_qualified_name(EVENT_NAME) {
            Some(name) => name,
            None => self.missing(EVENT_NAME),
        };
        let argument_list = self.accept_event_trigger_argument_list();
        let qualifier = self.accept_token(IMPORTANT_KEYWORD);
        let body = self.expect_block(BlockKind::Trigger);
        self.tree.node(
            EVENT_TRIGGER,
            vec![
                Some(trigger_keyword),
                Some(event_keyword),
                Some(event_name),
                argument_list,
                qualifier,
                Some(body),
            ],
        )
    }

    fn accept_event_trigger_argument_list(&mut self) -> Option<NodeId> {
        let open = self.accept_token(OPEN_PARENTHESES_TOKEN)?;
        let arguments = self.accept_separated_list(
            |parser| parser.accept_token_any(&[HANDLED_KEYWORD, SET_HANDLED_KEYWORD]),
            HANDLED_KEYWORD,
        );
        let close = self.expect_token(CLOSE_PARENTHESES_TOKEN);
        Some(self.tree.node(
            EVENT_TRIGGER_ARGUMENT_LIST,
            vec![Some(open), arguments, Some(close)],
        ))
    }

    fn parse_property_trigger(&mut self) -> NodeId {
        let trigger_keyword = self.bump();
        let property_keyword = self.bump();
        let conditions = match self.accept_separated_list(
            Self::accept_property_trigger_condition,
            PROPERTY_TRIGGER_CONDITION,
        ) {
            Some(conditions) => Some(conditions),
            None => {
                let condition = self.missing(PROPERTY_TRIGGER_CONDITION);
                self.tree.separated_list(vec![condition])
            }
        };
        let qualifier = self.accept_token(IMPORTANT_KEYWORD);
        let body = self.expect_block(BlockKind::Trigger);
        self.tree.node(
            PROPERTY_TRIGGER,
            vec![
                Some(trigger_keyword),
                Some(property_keyword),
                conditions,
                qualifier,
                Some(body),
            ],
        )
    }

    fn accept_property_trigger_condition(&mut self) -> Option<NodeId> {
        let property_name = self.accept_qualified_name(PROPERTY_NAME)?;
        let operator = self.expect_token_any(COMPARISON_OPERATORS);
        let value = self.expect_property_value_with_braces();
        Some(self.tree.node(
            PROPERTY_TRIGGER_CONDITION,
            vec![Some(property_name), Some(operator), Some(value)],
        ))
    }

    fn parse_transition(&mut self) -> NodeId {
        let keyword = self.bump();
        let argument_list = match self.accept_transition_argument_list() {
            Some(arguments) => arguments,
            None => self.missing(TRANSITION_ARGUMENT_LIST),
        };
        let colon = self.expect_token(COLON_TOKEN);
        let value = self.expect_property_value();
        let qualifier = self.accept_token(IMPORTANT_KEYWORD);
        let semicolon = self.expect_token(SEMICOLON_TOKEN);
        self.tree.node(
            TRANSITION,
            vec![
                Some(keyword),
                Some(argument_list),
                Some(colon),
                Some(value),
                qualifier,
                Some(semicolon),
            ],
        )
    }

    fn accept_transition_argument_list(&mut self) -> Option<NodeId> {
        let open = self.accept_token(OPEN_PARENTHESES_TOKEN)?;
        let arguments = self.accept_separated_list(Self::accept_identifier, IDENTIFIER);
        let close = self.expect_token(CLOSE_PARENTHESES_TOKEN);
        Some(self.tree.node(
            TRANSITION_ARGUMENT_LIST,
            vec![Some(open), arguments, Some(close)],
        ))
    }

    // ========== TRIGGER ACTIONS ==========

    fn parse_play_storyboard_trigger_action(&mut self) -> NodeId {
        let keyword = self.bump();
        let selector = self.accept_selector_with_parentheses();
        let value = self.expect_property_value_with_braces();
        self.tree.node(
            PLAY_STORYBOARD_TRIGGER_ACTION,
            vec![Some(keyword), selector, Some(value)],
        )
    }

    fn parse_play_sfx_trigger_action(&mut self) -> NodeId {
        let keyword = self.bump();
        let value = self.expect_property_value_with_braces();
        self.tree
            .node(PLAY_SFX_TRIGGER_ACTION, vec![Some(keyword), Some(value)])
    }

    fn parse_set_trigger_action(&mut self) -> NodeId {
        let keyword = self.bump();
        let property_name = self.expect_property_name();
        let selector = self.accept_selector_with_parentheses();
        let value = self.expect_property_value_with_braces();
        self.tree.node(
            SET_TRIGGER_ACTION,
            vec![Some(keyword), Some(property_name), selector, Some(value)],
        )
    }

    // ========== STORYBOARDS ==========

    fn parse_storyboard(&mut self) -> NodeId {
        let at_sign = self.bump();
        let name = self.expect_identifier();
        let loop_identifier = self.accept_identifier();
        let body = self.expect_block(BlockKind::Storyboard);
        self.tree.node(
            STORYBOARD,
            vec![Some(at_sign), Some(name), loop_identifier, Some(body)],
        )
    }

    fn parse_storyboard_target(&mut self) -> NodeId {
        let keyword = self.bump();
        let type_name = self.accept_identifier();
        let selector = self.accept_selector_with_parentheses();
        let body = self.expect_block(BlockKind::Target);
        self.tree.node(
            STORYBOARD_TARGET,
            vec![Some(keyword), type_name, selector, Some(body)],
        )
    }

    fn parse_animation(&mut self) -> NodeId {
        let keyword = self.bump();
        let property_name = self.expect_property_name();
        let navigation = self.accept_navigation_expression();
        let body = self.expect_block(BlockKind::Animation);
        self.tree.node(
            ANIMATION,
            vec![Some(keyword), Some(property_name), navigation, Some(body)],
        )
    }

    fn parse_animation_keyframe(&mut self) -> NodeId {
        let keyword = self.bump();
        let time = self.expect_token(NUMBER_TOKEN);
        let easing = self.accept_identifier();
        let value = self.expect_property_value_with_braces();
        self.tree.node(
            ANIMATION_KEYFRAME,
            vec![Some(keyword), Some(time), easing, Some(value)],
        )
    }
}
