//! Typed views over `LIST` nodes.
//!
//! An absent list slot is an empty list, so both views wrap an
//! `Option<SyntaxNode>`.

use crate::SyntaxNode;

/// Physical shape of a list, chosen by its child count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    Empty,
    Single,
    Two,
    /// Three to nine children.
    Many,
    /// Ten children or more.
    Lots,
}

impl ListShape {
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => ListShape::Empty,
            1 => ListShape::Single,
            2 => ListShape::Two,
            3..=9 => ListShape::Many,
            _ => ListShape::Lots,
        }
    }
}

/// A list of nodes.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxList<'t> {
    node: Option<SyntaxNode<'t>>,
}

impl<'t> SyntaxList<'t> {
    pub fn new(node: Option<SyntaxNode<'t>>) -> Self {
        Self { node }
    }

    /// The underlying `LIST` node, if any.
    pub fn node(&self) -> Option<SyntaxNode<'t>> {
        self.node
    }

    pub fn count(&self) -> usize {
        self.node.map_or(0, |node| node.slot_count())
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn item(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.node?.slot(index).ok().flatten()
    }

    pub fn iter(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        let node = self.node;
        (0..self.count()).filter_map(move |index| node?.slot(index).ok().flatten())
    }

    pub fn shape(&self) -> ListShape {
        ListShape::for_count(self.count())
    }
}

/// A list of items interleaved with separator tokens: `a , b , c`.
///
/// Items sit at even child indices and separators at odd ones.
#[derive(Debug, Clone, Copy)]
pub struct SeparatedSyntaxList<'t> {
    list: SyntaxList<'t>,
}

impl<'t> SeparatedSyntaxList<'t> {
    pub fn new(node: Option<SyntaxNode<'t>>) -> Self {
        Self {
            list: SyntaxList::new(node),
        }
    }

    pub fn node(&self) -> Option<SyntaxNode<'t>> {
        self.list.node()
    }

    /// Number of items, separators excluded.
    pub fn count(&self) -> usize {
        self.list.count().div_ceil(2)
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.list.item(index * 2)
    }

    pub fn separator_count(&self) -> usize {
        self.list.count() / 2
    }

    /// The separator following item `index`.
    pub fn separator(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.list.item(index * 2 + 1)
    }

    pub fn iter(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.list.iter().step_by(2)
    }

    pub fn separators(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.list.iter().skip(1).step_by(2)
    }

    /// Items and separators in source order.
    pub fn with_separators(self) -> impl Iterator<Item = SyntaxNode<'t>> + 't {
        self.list.iter()
    }
}
