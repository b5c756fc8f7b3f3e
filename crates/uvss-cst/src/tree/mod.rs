//! Arena storage for syntax trees.
//!
//! Every node, token and trivia of a tree lives in one [`SyntaxTree`] and is
//! addressed by a [`NodeId`]. Nodes are immutable once built, with one
//! exception: a token's trivia may be replaced in place (see
//! [`SyntaxTree::change_trivia`]).
//!
//! Positions and widths are computed lazily and memoized per node. Each memo
//! is tagged with the tree's generation; reparenting a node or mutating trivia
//! bumps the generation, which invalidates every memo at once.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;
use uvss_tokenizer::Span;

use crate::SyntaxKind;

mod factory;
mod node;

pub use node::{Descendants, SyntaxNode};

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The index of this node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Error returned by [`SyntaxTree::slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Tokens and trivia have no slots.
    NoSlots { kind: SyntaxKind },
    /// The index is past the node's slot count.
    OutOfRange {
        kind: SyntaxKind,
        index: usize,
        count: usize,
    },
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotError::NoSlots { kind } => write!(f, "{kind:?} has no slots"),
            SlotError::OutOfRange { kind, index, count } => {
                write!(f, "slot {index} out of range for {kind:?} with {count} slots")
            }
        }
    }
}

impl std::error::Error for SlotError {}

/// A memoized `u32`, valid for one generation of the tree.
#[derive(Debug, Default)]
struct Memo(AtomicU64);

impl Memo {
    fn get(&self, generation: u32) -> Option<u32> {
        let packed = self.0.load(Ordering::Relaxed);
        ((packed >> 32) as u32 == generation).then_some(packed as u32)
    }

    fn set(&self, generation: u32, value: u32) {
        let packed = (u64::from(generation) << 32) | u64::from(value);
        self.0.store(packed, Ordering::Relaxed);
    }
}

#[derive(Debug)]
pub(crate) enum Body {
    Token {
        text: Box<str>,
        leading: Option<NodeId>,
        trailing: Option<NodeId>,
    },
    Trivia {
        text: Box<str>,
    },
    StructuredTrivia {
        structure: NodeId,
    },
    List {
        children: Box<[NodeId]>,
        separated: bool,
    },
    Composite {
        slots: Box<[Option<NodeId>]>,
    },
}

impl Body {
    /// Every direct child, trivia included.
    fn children(&self) -> Vec<NodeId> {
        match self {
            Body::Token {
                leading, trailing, ..
            } => leading.iter().chain(trailing).copied().collect(),
            Body::Trivia { .. } => Vec::new(),
            Body::StructuredTrivia { structure } => vec![*structure],
            Body::List { children, .. } => children.to_vec(),
            Body::Composite { slots } => slots.iter().flatten().copied().collect(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) body: Body,
    pub(crate) parent: Option<NodeId>,
    pub(crate) missing: bool,
    pub(crate) stale: bool,
    position: Memo,
    full_width: Memo,
}

/// Arena holding every element of one or more syntax trees.
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    generation: u32,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.nodes.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl SyntaxTree {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            // Memos start out zeroed, so generation 0 would look cached.
            generation: 1,
        }
    }

    /// Number of elements allocated in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A read handle for `id`.
    pub fn syntax(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode::new(self, id)
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1).max(1);
    }

    pub(crate) fn alloc(&mut self, kind: SyntaxKind, body: Body, missing: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let children = body.children();
        self.nodes.push(NodeData {
            kind,
            body,
            parent: None,
            missing,
            stale: false,
            position: Memo::default(),
            full_width: Memo::default(),
        });
        for child in children {
            self.adopt(id, child);
        }
        id
    }

    /// Make `parent` the parent of `child`; the previous parent goes stale.
    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        let previous = self.data_mut(child).parent.replace(parent);
        if let Some(previous) = previous {
            if previous != parent {
                trace!(?child, ?previous, ?parent, "reparented");
                self.data_mut(previous).stale = true;
                self.bump_generation();
            }
        }
    }

    /// Forget `child`'s parent without marking the parent stale.
    fn detach(&mut self, child: NodeId) {
        self.data_mut(child).parent = None;
        if self.data(child).kind == SyntaxKind::LIST && self.is_trivia_list(child) {
            for item in self.list_children(child).to_vec() {
                self.data_mut(item).parent = None;
            }
        }
    }

    fn is_trivia_list(&self, id: NodeId) -> bool {
        self.list_children(id)
            .first()
            .is_some_and(|&first| self.kind(first).is_trivia())
    }

    // ========== ATTRIBUTES ==========

    /// The node's syntax kind.
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.data(id).kind
    }

    /// The node that currently owns `id`; `None` for a root or a detached node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Whether the node was synthesized by error recovery and covers no text.
    pub fn is_missing(&self, id: NodeId) -> bool {
        self.data(id).missing
    }

    /// Whether one of this node's children has since been moved into another parent.
    pub fn is_stale(&self, id: NodeId) -> bool {
        self.data(id).stale
    }

    /// Whether the node is a token (as opposed to trivia, a list or a composite).
    pub fn is_token(&self, id: NodeId) -> bool {
        matches!(self.data(id).body, Body::Token { .. })
    }

    /// Whether the node is trivia, structured trivia included.
    pub fn is_trivia(&self, id: NodeId) -> bool {
        matches!(
            self.data(id).body,
            Body::Trivia { .. } | Body::StructuredTrivia { .. }
        )
    }

    /// Whether the node is a `LIST`.
    pub fn is_list(&self, id: NodeId) -> bool {
        matches!(self.data(id).body, Body::List { .. })
    }

    /// Whether the node is a list of items interleaved with separators.
    pub fn is_separated_list(&self, id: NodeId) -> bool {
        matches!(self.data(id).body, Body::List { separated: true, .. })
    }

    /// Token or trivia text; empty for every other node.
    pub fn text(&self, id: NodeId) -> &str {
        match &self.data(id).body {
            Body::Token { text, .. } | Body::Trivia { text } => text,
            _ => "",
        }
    }

    /// The sub-tree wrapped by structured trivia.
    pub fn structure(&self, id: NodeId) -> Option<NodeId> {
        match self.data(id).body {
            Body::StructuredTrivia { structure } => Some(structure),
            _ => None,
        }
    }

    /// Number of children: slots of a composite, items of a list.
    pub fn slot_count(&self, id: NodeId) -> usize {
        match &self.data(id).body {
            Body::Token { .. } | Body::Trivia { .. } => 0,
            Body::StructuredTrivia { .. } => 1,
            Body::List { children, .. } => children.len(),
            Body::Composite { slots } => slots.len(),
        }
    }

    /// The child in slot `index`; `Ok(None)` for an empty optional slot.
    pub fn slot(&self, id: NodeId, index: usize) -> Result<Option<NodeId>, SlotError> {
        let data = self.data(id);
        let count = self.slot_count(id);
        let out_of_range = SlotError::OutOfRange {
            kind: data.kind,
            index,
            count,
        };
        match &data.body {
            Body::Token { .. } | Body::Trivia { .. } => Err(SlotError::NoSlots { kind: data.kind }),
            Body::StructuredTrivia { structure } if index == 0 => Ok(Some(*structure)),
            Body::StructuredTrivia { .. } => Err(out_of_range),
            Body::List { children, .. } => children
                .get(index)
                .map(|&child| Some(child))
                .ok_or(out_of_range),
            Body::Composite { slots } => slots.get(index).copied().ok_or(out_of_range),
        }
    }

    /// The child in the slot called `name`, for composite nodes.
    pub fn named_slot(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let index = self.kind(id).slot_index(name)?;
        self.slot(id, index).ok().flatten()
    }

    /// Children of a list node; empty for anything else.
    pub fn list_children(&self, id: NodeId) -> &[NodeId] {
        match &self.data(id).body {
            Body::List { children, .. } => children,
            _ => &[],
        }
    }

    /// Non-empty direct children, excluding trivia.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        match &self.data(id).body {
            Body::Token { .. } | Body::Trivia { .. } => Vec::new(),
            body => body.children(),
        }
    }

    pub(crate) fn leading_slot(&self, id: NodeId) -> Option<NodeId> {
        match self.data(id).body {
            Body::Token { leading, .. } => leading,
            _ => None,
        }
    }

    pub(crate) fn trailing_slot(&self, id: NodeId) -> Option<NodeId> {
        match self.data(id).body {
            Body::Token { trailing, .. } => trailing,
            _ => None,
        }
    }

    /// The trivia items stored in a token's leading or trailing slot.
    fn trivia_items(&self, slot: &Option<NodeId>) -> Vec<NodeId> {
        match *slot {
            Some(list) if self.kind(list) == SyntaxKind::LIST => self.list_children(list).to_vec(),
            _ => slot.iter().copied().collect(),
        }
    }

    /// Leading trivia of a token, in source order.
    pub fn leading_trivia(&self, id: NodeId) -> Vec<NodeId> {
        self.trivia_items(&self.leading_slot(id))
    }

    /// Trailing trivia of a token, in source order.
    pub fn trailing_trivia(&self, id: NodeId) -> Vec<NodeId> {
        self.trivia_items(&self.trailing_slot(id))
    }

    // ========== TRIVIA MUTATION ==========

    /// Replace a token's leading trivia.
    pub fn change_leading_trivia(&mut self, token: NodeId, trivia: Vec<NodeId>) {
        let trailing = self.trailing_trivia(token);
        self.change_trivia(token, trivia, trailing);
    }

    /// Replace a token's trailing trivia.
    pub fn change_trailing_trivia(&mut self, token: NodeId, trivia: Vec<NodeId>) {
        let leading = self.leading_trivia(token);
        self.change_trivia(token, leading, trivia);
    }

    /// Replace both trivia lists of a token in place.
    ///
    /// This is the one mutation a built tree allows. Every cached position and
    /// width in the arena is invalidated.
    pub fn change_trivia(&mut self, token: NodeId, leading: Vec<NodeId>, trailing: Vec<NodeId>) {
        let (old_leading, old_trailing) = match self.data(token).body {
            Body::Token {
                leading, trailing, ..
            } => (leading, trailing),
            _ => {
                debug_assert!(false, "change_trivia on non-token {:?}", self.kind(token));
                return;
            }
        };
        for old in old_leading.into_iter().chain(old_trailing) {
            self.detach(old);
        }

        let leading = self.trivia_list(leading);
        let trailing = self.trivia_list(trailing);
        if let Body::Token {
            leading: slot_leading,
            trailing: slot_trailing,
            ..
        } = &mut self.data_mut(token).body
        {
            *slot_leading = leading;
            *slot_trailing = trailing;
        }
        for child in leading.into_iter().chain(trailing) {
            self.adopt(token, child);
        }
        self.bump_generation();
    }

    // ========== WIDTHS AND POSITIONS ==========

    /// Width including all trivia.
    pub fn full_width(&self, id: NodeId) -> u32 {
        let data = self.data(id);
        if let Some(width) = data.full_width.get(self.generation) {
            return width;
        }
        let width = match &data.body {
            Body::Token {
                text,
                leading,
                trailing,
            } => {
                self.optional_full_width(*leading)
                    + text.len() as u32
                    + self.optional_full_width(*trailing)
            }
            Body::Trivia { text } => text.len() as u32,
            Body::StructuredTrivia { structure } => self.full_width(*structure),
            Body::List { children, .. } => children.iter().map(|&c| self.full_width(c)).sum(),
            Body::Composite { slots } => slots
                .iter()
                .map(|&slot| self.optional_full_width(slot))
                .sum(),
        };
        data.full_width.set(self.generation, width);
        width
    }

    fn optional_full_width(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.full_width(id))
    }

    /// Width of the leading trivia of the node's first token.
    pub fn leading_trivia_width(&self, id: NodeId) -> u32 {
        self.first_token(id)
            .map_or(0, |token| self.optional_full_width(self.leading_slot(token)))
    }

    /// Width of the trailing trivia of the node's last token.
    pub fn trailing_trivia_width(&self, id: NodeId) -> u32 {
        self.last_token(id)
            .map_or(0, |token| self.optional_full_width(self.trailing_slot(token)))
    }

    /// Width without the outer leading and trailing trivia.
    pub fn width(&self, id: NodeId) -> u32 {
        if self.is_trivia(id) {
            return self.full_width(id);
        }
        let outer = self.leading_trivia_width(id) + self.trailing_trivia_width(id);
        self.full_width(id).saturating_sub(outer)
    }

    /// Absolute byte offset of the node's first trivia.
    pub fn position(&self, id: NodeId) -> u32 {
        let data = self.data(id);
        if let Some(position) = data.position.get(self.generation) {
            return position;
        }
        let position = match data.parent {
            Some(parent) => self.position(parent) + self.offset_in_parent(parent, id),
            None => 0,
        };
        data.position.set(self.generation, position);
        position
    }

    fn offset_in_parent(&self, parent: NodeId, child: NodeId) -> u32 {
        match &self.data(parent).body {
            Body::Token {
                text,
                leading,
                trailing,
            } => {
                if *trailing == Some(child) {
                    self.optional_full_width(*leading) + text.len() as u32
                } else {
                    0
                }
            }
            Body::Trivia { .. } | Body::StructuredTrivia { .. } => 0,
            Body::List { children, .. } => children
                .iter()
                .take_while(|&&c| c != child)
                .map(|&c| self.full_width(c))
                .sum(),
            Body::Composite { slots } => slots
                .iter()
                .take_while(|&&slot| slot != Some(child))
                .map(|&slot| self.optional_full_width(slot))
                .sum(),
        }
    }

    /// Source range of the node without its outer trivia.
    pub fn span(&self, id: NodeId) -> Span {
        let start = if self.is_trivia(id) {
            self.position(id)
        } else {
            self.position(id) + self.leading_trivia_width(id)
        };
        Span::at(start, self.width(id))
    }

    /// Source range of the node including all trivia.
    pub fn full_span(&self, id: NodeId) -> Span {
        Span::at(self.position(id), self.full_width(id))
    }

    // ========== TOKENS ==========

    /// The first token under `id` that is not missing.
    pub fn first_token(&self, id: NodeId) -> Option<NodeId> {
        match &self.data(id).body {
            Body::Token { .. } => (!self.is_missing(id)).then_some(id),
            Body::Trivia { .. } | Body::StructuredTrivia { .. } => None,
            Body::List { children, .. } => children.iter().find_map(|&c| self.first_token(c)),
            Body::Composite { slots } => slots
                .iter()
                .flatten()
                .find_map(|&c| self.first_token(c)),
        }
    }

    /// The last token under `id` that is not missing.
    pub fn last_token(&self, id: NodeId) -> Option<NodeId> {
        match &self.data(id).body {
            Body::Token { .. } => (!self.is_missing(id)).then_some(id),
            Body::Trivia { .. } | Body::StructuredTrivia { .. } => None,
            Body::List { children, .. } => {
                children.iter().rev().find_map(|&c| self.last_token(c))
            }
            Body::Composite { slots } => slots
                .iter()
                .rev()
                .flatten()
                .find_map(|&c| self.last_token(c)),
        }
    }

    /// Write the exact source text of `id`, trivia included.
    pub fn write_to(&self, id: NodeId, out: &mut impl fmt::Write) -> fmt::Result {
        match &self.data(id).body {
            Body::Token {
                text,
                leading,
                trailing,
            } => {
                if let Some(leading) = leading {
                    self.write_to(*leading, out)?;
                }
                out.write_str(text)?;
                if let Some(trailing) = trailing {
                    self.write_to(*trailing, out)?;
                }
            }
            Body::Trivia { text } => out.write_str(text)?,
            Body::StructuredTrivia { structure } => self.write_to(*structure, out)?,
            Body::List { children, .. } => {
                for &child in children.iter() {
                    self.write_to(child, out)?;
                }
            }
            Body::Composite { slots } => {
                for &child in slots.iter().flatten() {
                    self.write_to(child, out)?;
                }
            }
        }
        Ok(())
    }

    /// The exact source text of `id`, trivia included.
    pub fn to_full_string(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(self.full_width(id) as usize);
        // Writing into a String cannot fail.
        let _ = self.write_to(id, &mut out);
        out
    }
}
