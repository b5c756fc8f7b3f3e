//! Read-only traversal with one method per node kind.

use crate::syntax_kind::for_each_node_kind;
use crate::{SyntaxKind, SyntaxNode};

macro_rules! syntax_visitor {
    ($($method:ident => $kind:ident,)*) => {
        /// A visitor over a syntax tree.
        ///
        /// [`visit`](SyntaxVisitor::visit) dispatches on the node's kind. Every
        /// per-kind method falls back to [`default_visit`](SyntaxVisitor::default_visit),
        /// which does nothing; override it with a call to
        /// [`walk_children`](SyntaxVisitor::walk_children) to visit the whole tree.
        pub trait SyntaxVisitor<'t> {
            fn visit(&mut self, node: SyntaxNode<'t>) {
                match node.kind() {
                    $(SyntaxKind::$kind => self.$method(node),)*
                    SyntaxKind::LIST => self.visit_list(node),
                    SyntaxKind::SKIPPED_TOKENS_TRIVIA => self.visit_skipped_tokens_trivia(node),
                    kind if kind.is_trivia() => self.visit_trivia(node),
                    _ => self.visit_token(node),
                }
            }

            fn default_visit(&mut self, _node: SyntaxNode<'t>) {}

            /// Visit each child of `node`; a token's children are its trivia.
            fn walk_children(&mut self, node: SyntaxNode<'t>) {
                if node.is_token() {
                    for trivia in node.leading_trivia() {
                        self.visit(trivia);
                    }
                    for trivia in node.trailing_trivia() {
                        self.visit(trivia);
                    }
                } else {
                    for child in node.child_nodes() {
                        self.visit(child);
                    }
                }
            }

            fn visit_list(&mut self, node: SyntaxNode<'t>) {
                self.default_visit(node)
            }

            fn visit_token(&mut self, node: SyntaxNode<'t>) {
                self.default_visit(node)
            }

            fn visit_trivia(&mut self, node: SyntaxNode<'t>) {
                self.default_visit(node)
            }

            fn visit_skipped_tokens_trivia(&mut self, node: SyntaxNode<'t>) {
                self.default_visit(node)
            }

            $(
                #[doc = concat!("Visit a `", stringify!($kind), "` node.")]
                fn $method(&mut self, node: SyntaxNode<'t>) {
                    self.default_visit(node)
                }
            )*
        }
    };
}

for_each_node_kind!(syntax_visitor);
