//! Tree rewriting with one method per node kind.
//!
//! A rewriter maps each node to a replacement `NodeId` in the same arena.
//! Unchanged sub-trees keep their ids, so rewriting with no overrides returns
//! the input node itself. Returning `None` removes a node from the list or
//! optional slot that held it.

use tracing::debug;

use crate::syntax_kind::for_each_node_kind;
use crate::{NodeId, SyntaxKind, SyntaxTree};

macro_rules! syntax_rewriter {
    ($($method:ident => $kind:ident,)*) => {
        /// A rewriter over a syntax tree.
        ///
        /// Every per-kind method defaults to rebuilding the node from its
        /// rewritten children, and only when one of them changed.
        pub trait SyntaxRewriter {
            fn visit(&mut self, tree: &mut SyntaxTree, node: NodeId) -> Option<NodeId> {
                match tree.kind(node) {
                    $(SyntaxKind::$kind => self.$method(tree, node),)*
                    SyntaxKind::LIST => self.visit_list(tree, node),
                    SyntaxKind::SKIPPED_TOKENS_TRIVIA => self.visit_skipped_tokens_trivia(tree, node),
                    kind if kind.is_trivia() => self.visit_trivia(tree, node),
                    _ => self.visit_token(tree, node),
                }
            }

            fn visit_list(&mut self, tree: &mut SyntaxTree, node: NodeId) -> Option<NodeId> {
                rewrite_list(self, tree, node)
            }

            /// Rewrites the token's trivia.
            fn visit_token(&mut self, tree: &mut SyntaxTree, node: NodeId) -> Option<NodeId> {
                rewrite_token(self, tree, node)
            }

            fn visit_trivia(&mut self, _tree: &mut SyntaxTree, node: NodeId) -> Option<NodeId> {
                Some(node)
            }

            fn visit_skipped_tokens_trivia(
                &mut self,
                tree: &mut SyntaxTree,
                node: NodeId,
            ) -> Option<NodeId> {
                rewrite_structured_trivia(self, tree, node)
            }

            $(
                #[doc = concat!("Rewrite a `", stringify!($kind), "` node.")]
                fn $method(&mut self, tree: &mut SyntaxTree, node: NodeId) -> Option<NodeId> {
                    rewrite_composite(self, tree, node)
                }
            )*
        }
    };
}

for_each_node_kind!(syntax_rewriter);

/// Rewrite every slot of a composite node, rebuilding it if any slot changed.
pub fn rewrite_composite<R: SyntaxRewriter + ?Sized>(
    rewriter: &mut R,
    tree: &mut SyntaxTree,
    node: NodeId,
) -> Option<NodeId> {
    let slots: Vec<Option<NodeId>> = (0..tree.slot_count(node))
        .map(|index| tree.slot(node, index).ok().flatten())
        .collect();
    let mut changed = false;
    let rewritten: Vec<Option<NodeId>> = slots
        .iter()
        .map(|&slot| {
            let child = slot?;
            let new = rewriter.visit(tree, child);
            changed |= new != Some(child);
            new
        })
        .collect();
    if !changed {
        return Some(node);
    }
    let kind = tree.kind(node);
    debug!(?kind, ?node, "rebuilding node");
    Some(tree.node(kind, rewritten))
}

/// Rewrite the children of a list.
///
/// In a separated list, removing an item also removes the separator that
/// follows it (or, for the last item, the one before it). An emptied list is
/// removed.
pub fn rewrite_list<R: SyntaxRewriter + ?Sized>(
    rewriter: &mut R,
    tree: &mut SyntaxTree,
    node: NodeId,
) -> Option<NodeId> {
    let children = tree.list_children(node).to_vec();
    let separated = tree.is_separated_list(node);
    let rewritten: Vec<Option<NodeId>> = children
        .iter()
        .map(|&child| rewriter.visit(tree, child))
        .collect();

    let new_children: Vec<NodeId> = if separated {
        join_separated(&rewritten)
    } else {
        rewritten.iter().flatten().copied().collect()
    };
    if new_children == children {
        return Some(node);
    }
    debug!(?node, old = children.len(), new = new_children.len(), "rebuilding list");
    if separated {
        tree.separated_list(new_children)
    } else {
        tree.list(new_children)
    }
}

/// Re-pair surviving items with their separators.
fn join_separated(rewritten: &[Option<NodeId>]) -> Vec<NodeId> {
    // (item, separator after it, whether it was the original last item)
    let item_count = rewritten.len().div_ceil(2);
    let kept: Vec<(NodeId, Option<NodeId>, bool)> = rewritten
        .chunks(2)
        .enumerate()
        .filter_map(|(index, pair)| {
            let item = pair[0]?;
            let separator = pair.get(1).copied().flatten();
            Some((item, separator, index + 1 == item_count))
        })
        .collect();

    let mut out = Vec::with_capacity(kept.len() * 2);
    for (position, &(item, separator, original_last)) in kept.iter().enumerate() {
        out.push(item);
        let is_last = position + 1 == kept.len();
        if !is_last || original_last {
            out.extend(separator);
        }
    }
    out
}

/// Rewrite a token's trivia, rebuilding the token if any of it changed.
pub fn rewrite_token<R: SyntaxRewriter + ?Sized>(
    rewriter: &mut R,
    tree: &mut SyntaxTree,
    node: NodeId,
) -> Option<NodeId> {
    let leading = tree.leading_trivia(node);
    let trailing = tree.trailing_trivia(node);
    let new_leading: Vec<NodeId> = leading
        .iter()
        .filter_map(|&trivia| rewriter.visit(tree, trivia))
        .collect();
    let new_trailing: Vec<NodeId> = trailing
        .iter()
        .filter_map(|&trivia| rewriter.visit(tree, trivia))
        .collect();
    if new_leading == leading && new_trailing == trailing {
        return Some(node);
    }
    Some(tree.with_trivia(node, new_leading, new_trailing))
}

/// Rewrite the sub-tree of structured trivia.
pub fn rewrite_structured_trivia<R: SyntaxRewriter + ?Sized>(
    rewriter: &mut R,
    tree: &mut SyntaxTree,
    node: NodeId,
) -> Option<NodeId> {
    let structure = tree.structure(node)?;
    let new = rewriter.visit(tree, structure)?;
    if new == structure {
        return Some(node);
    }
    let kind = tree.kind(node);
    Some(tree.structured_trivia(kind, new))
}
