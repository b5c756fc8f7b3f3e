//! Construction of tokens, trivia, lists and composite nodes.

use super::{Body, NodeId, SyntaxTree};
use crate::SyntaxKind;
use crate::syntax_kind::SlotShape;

impl SyntaxTree {
    /// Build a token with the given trivia.
    pub fn token(
        &mut self,
        kind: SyntaxKind,
        text: impl Into<Box<str>>,
        leading: Vec<NodeId>,
        trailing: Vec<NodeId>,
    ) -> NodeId {
        debug_assert!(kind.is_token(), "{kind:?} is not a token kind");
        let leading = self.trivia_list(leading);
        let trailing = self.trivia_list(trailing);
        self.alloc(
            kind,
            Body::Token {
                text: text.into(),
                leading,
                trailing,
            },
            false,
        )
    }

    /// A zero-width placeholder for a token the parser expected but did not find.
    pub fn missing_token(&mut self, kind: SyntaxKind) -> NodeId {
        self.alloc(
            kind,
            Body::Token {
                text: "".into(),
                leading: None,
                trailing: None,
            },
            true,
        )
    }

    /// A token whose trivia slots are already grouped.
    pub(crate) fn token_with_slots(
        &mut self,
        kind: SyntaxKind,
        text: impl Into<Box<str>>,
        leading: Option<NodeId>,
        trailing: Option<NodeId>,
        missing: bool,
    ) -> NodeId {
        self.alloc(
            kind,
            Body::Token {
                text: text.into(),
                leading,
                trailing,
            },
            missing,
        )
    }

    /// Rebuild `token` with new trivia; its kind, text and missingness are kept.
    pub fn with_trivia(
        &mut self,
        token: NodeId,
        leading: Vec<NodeId>,
        trailing: Vec<NodeId>,
    ) -> NodeId {
        let kind = self.kind(token);
        let missing = self.is_missing(token);
        let text: Box<str> = self.text(token).into();
        let leading = self.trivia_list(leading);
        let trailing = self.trivia_list(trailing);
        self.alloc(
            kind,
            Body::Token {
                text,
                leading,
                trailing,
            },
            missing,
        )
    }

    /// Build an unstructured trivia element.
    pub fn trivia(&mut self, kind: SyntaxKind, text: impl Into<Box<str>>) -> NodeId {
        debug_assert!(
            kind.is_trivia() && !kind.is_structured_trivia(),
            "{kind:?} is not a trivia kind"
        );
        self.alloc(kind, Body::Trivia { text: text.into() }, false)
    }

    pub fn whitespace(&mut self, text: impl Into<Box<str>>) -> NodeId {
        self.trivia(SyntaxKind::WHITESPACE_TRIVIA, text)
    }

    pub fn end_of_line(&mut self, text: impl Into<Box<str>>) -> NodeId {
        self.trivia(SyntaxKind::END_OF_LINE_TRIVIA, text)
    }

    /// Group trivia for a token slot: nothing, the lone trivia, or a `LIST`.
    pub fn trivia_list(&mut self, items: Vec<NodeId>) -> Option<NodeId> {
        match items.len() {
            0 => None,
            1 => Some(items[0]),
            _ => Some(self.alloc_list(items, false)),
        }
    }

    /// Wrap tokens the parser could not place into structured trivia.
    pub fn skipped_tokens_trivia(&mut self, tokens: Vec<NodeId>) -> NodeId {
        let structure = self.alloc_list(tokens, false);
        self.structured_trivia(SyntaxKind::SKIPPED_TOKENS_TRIVIA, structure)
    }

    /// Structured trivia around an existing sub-tree.
    pub(crate) fn structured_trivia(&mut self, kind: SyntaxKind, structure: NodeId) -> NodeId {
        debug_assert!(kind.is_structured_trivia(), "{kind:?} is not structured trivia");
        self.alloc(kind, Body::StructuredTrivia { structure }, false)
    }

    /// A list of nodes; `None` when `children` is empty.
    pub fn list(&mut self, children: Vec<NodeId>) -> Option<NodeId> {
        (!children.is_empty()).then(|| self.alloc_list(children, false))
    }

    /// A list of items interleaved with separator tokens; `None` when empty.
    pub fn separated_list(&mut self, children: Vec<NodeId>) -> Option<NodeId> {
        (!children.is_empty()).then(|| self.alloc_list(children, true))
    }

    pub(crate) fn alloc_list(&mut self, children: Vec<NodeId>, separated: bool) -> NodeId {
        let missing = self.all_missing(&children);
        self.alloc(
            SyntaxKind::LIST,
            Body::List {
                children: children.into_boxed_slice(),
                separated,
            },
            missing,
        )
    }

    /// A node is missing when it has children and all of them are missing.
    fn all_missing(&self, children: &[NodeId]) -> bool {
        !children.is_empty() && children.iter().all(|&child| self.is_missing(child))
    }

    /// Build a composite node; `slots` must follow `kind`'s slot layout.
    pub fn node(&mut self, kind: SyntaxKind, slots: Vec<Option<NodeId>>) -> NodeId {
        debug_assert!(kind.is_composite(), "{kind:?} is not a composite kind");
        debug_assert_eq!(
            slots.len(),
            kind.slots().len(),
            "wrong slot count for {kind:?}"
        );
        let present: Vec<NodeId> = slots.iter().flatten().copied().collect();
        let missing = self.all_missing(&present);
        self.alloc(
            kind,
            Body::Composite {
                slots: slots.into_boxed_slice(),
            },
            missing,
        )
    }

    /// A placeholder for a node the parser expected but did not find.
    ///
    /// Required slots are filled with missing tokens and nodes. List slots are
    /// left empty unless the node would otherwise have no children at all, in
    /// which case the first list gets a single missing element.
    pub fn missing_node(&mut self, kind: SyntaxKind) -> NodeId {
        let layout = kind.slots();
        let mut slots: Vec<Option<NodeId>> = layout
            .iter()
            .map(|slot| {
                if slot.optional {
                    return None;
                }
                match slot.shape {
                    SlotShape::Token(kinds) => Some(self.missing_token(kinds[0])),
                    SlotShape::Node(kind) => Some(self.missing_node(kind)),
                    SlotShape::List(_) | SlotShape::SeparatedList(_) => None,
                }
            })
            .collect();

        if slots.iter().all(Option::is_none) {
            let first_list = layout.iter().enumerate().find_map(|(index, slot)| match slot.shape {
                SlotShape::List(element) => Some((index, element, false)),
                SlotShape::SeparatedList(element) => Some((index, element, true)),
                _ => None,
            });
            if let Some((index, element, separated)) = first_list {
                let item = if element.is_token() {
                    self.missing_token(element)
                } else {
                    self.missing_node(element)
                };
                slots[index] = Some(self.alloc_list(vec![item], separated));
            }
        }

        self.node(kind, slots)
    }
}
