//! Borrowed read handles over the arena.

use std::fmt;

use uvss_tokenizer::Span;

use super::{NodeId, SlotError, SyntaxTree};
use crate::SyntaxKind;

/// A node, token or trivia in a [`SyntaxTree`].
///
/// This is a cheap `Copy` handle; all data lives in the arena.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl<'t> SyntaxNode<'t> {
    pub(crate) fn new(tree: &'t SyntaxTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn wrap(&self, id: NodeId) -> SyntaxNode<'t> {
        SyntaxNode::new(self.tree, id)
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> SyntaxKind {
        self.tree.kind(self.id)
    }

    pub fn slot_count(&self) -> usize {
        self.tree.slot_count(self.id)
    }

    pub fn slot(&self, index: usize) -> Result<Option<SyntaxNode<'t>>, SlotError> {
        Ok(self.tree.slot(self.id, index)?.map(|id| self.wrap(id)))
    }

    /// The child in the slot called `name`.
    pub fn named_slot(&self, name: &str) -> Option<SyntaxNode<'t>> {
        self.tree.named_slot(self.id, name).map(|id| self.wrap(id))
    }

    pub fn is_missing(&self) -> bool {
        self.tree.is_missing(self.id)
    }

    pub fn is_stale(&self) -> bool {
        self.tree.is_stale(self.id)
    }

    pub fn is_token(&self) -> bool {
        self.tree.is_token(self.id)
    }

    pub fn is_trivia(&self) -> bool {
        self.tree.is_trivia(self.id)
    }

    pub fn is_list(&self) -> bool {
        self.tree.is_list(self.id)
    }

    pub fn position(&self) -> u32 {
        self.tree.position(self.id)
    }

    pub fn full_width(&self) -> u32 {
        self.tree.full_width(self.id)
    }

    pub fn width(&self) -> u32 {
        self.tree.width(self.id)
    }

    pub fn leading_trivia_width(&self) -> u32 {
        self.tree.leading_trivia_width(self.id)
    }

    pub fn trailing_trivia_width(&self) -> u32 {
        self.tree.trailing_trivia_width(self.id)
    }

    pub fn span(&self) -> Span {
        self.tree.span(self.id)
    }

    pub fn full_span(&self) -> Span {
        self.tree.full_span(self.id)
    }

    /// Token or trivia text.
    pub fn text(&self) -> &'t str {
        self.tree.text(self.id)
    }

    pub fn leading_trivia(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let tree = self.tree;
        tree.leading_trivia(self.id)
            .into_iter()
            .map(move |id| SyntaxNode::new(tree, id))
    }

    pub fn trailing_trivia(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let tree = self.tree;
        tree.trailing_trivia(self.id)
            .into_iter()
            .map(move |id| SyntaxNode::new(tree, id))
    }

    /// The sub-tree of a structured trivia.
    pub fn structure(&self) -> Option<SyntaxNode<'t>> {
        self.tree.structure(self.id).map(|id| self.wrap(id))
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.tree.parent(self.id).map(|id| self.wrap(id))
    }

    /// Ancestors, starting with the parent.
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Non-empty direct children.
    pub fn child_nodes(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let tree = self.tree;
        tree.child_ids(self.id)
            .into_iter()
            .map(move |id| SyntaxNode::new(tree, id))
    }

    /// Preorder walk below this node.
    ///
    /// `descend_into` decides whether the walk enters a node's children (the
    /// node itself is always yielded). With `descend_into_trivia`, token
    /// trivia and the contents of structured trivia are walked too.
    pub fn descendant_nodes<'f>(
        &self,
        descend_into: Option<&'f dyn Fn(SyntaxNode<'t>) -> bool>,
        descend_into_trivia: bool,
    ) -> Descendants<'t, 'f> {
        let mut stack = self.children_for_walk(descend_into_trivia);
        stack.reverse();
        Descendants {
            tree: self.tree,
            stack,
            descend_into,
            descend_into_trivia,
        }
    }

    fn children_for_walk(&self, with_trivia: bool) -> Vec<NodeId> {
        if self.is_token() {
            if !with_trivia {
                return Vec::new();
            }
            let mut trivia = self.tree.leading_trivia(self.id);
            trivia.extend(self.tree.trailing_trivia(self.id));
            return trivia;
        }
        if self.is_trivia() && !with_trivia {
            return Vec::new();
        }
        self.tree.child_ids(self.id)
    }

    /// Every token under this node in source order, missing ones included.
    pub fn tokens(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let start = self.is_token().then_some(self);
        start
            .into_iter()
            .chain(self.descendant_nodes(None, false))
            .filter(|node| node.is_token())
    }

    pub fn first_token(&self) -> Option<SyntaxNode<'t>> {
        self.tree.first_token(self.id).map(|id| self.wrap(id))
    }

    pub fn last_token(&self) -> Option<SyntaxNode<'t>> {
        self.tree.last_token(self.id).map(|id| self.wrap(id))
    }

    /// The exact source text, trivia included.
    pub fn to_full_string(&self) -> String {
        self.tree.to_full_string(self.id)
    }

    pub fn write_to(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.tree.write_to(self.id, out)
    }

    fn dump(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let span = self.span();
        write!(f, "{indent}{label}{:?}@{}..{}", self.kind(), span.start, span.end)?;
        if self.is_token() || (self.is_trivia() && self.structure().is_none()) {
            write!(f, " {:?}", self.text())?;
        }
        if self.is_missing() {
            f.write_str(" (missing)")?;
        }
        writeln!(f)?;

        if self.is_token() {
            for trivia in self.leading_trivia() {
                trivia.dump(f, depth + 1, "leading ")?;
            }
            for trivia in self.trailing_trivia() {
                trivia.dump(f, depth + 1, "trailing ")?;
            }
            return Ok(());
        }
        for child in self.child_nodes() {
            child.dump(f, depth + 1, "")?;
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    /// `{:?}` prints the kind and range; `{:#?}` dumps the whole sub-tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.dump(f, 0, "")
        } else {
            let span = self.span();
            write!(f, "{:?}@{}..{}", self.kind(), span.start, span.end)
        }
    }
}

/// Preorder iterator returned by [`SyntaxNode::descendant_nodes`].
pub struct Descendants<'t, 'f> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
    descend_into: Option<&'f dyn Fn(SyntaxNode<'t>) -> bool>,
    descend_into_trivia: bool,
}

impl<'t> Iterator for Descendants<'t, '_> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = SyntaxNode::new(self.tree, id);
        let descend = self.descend_into.is_none_or(|descend_into| descend_into(node));
        if descend {
            let children = node.children_for_walk(self.descend_into_trivia);
            self.stack.extend(children.into_iter().rev());
        }
        Some(node)
    }
}
