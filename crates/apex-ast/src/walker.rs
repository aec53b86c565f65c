//! Depth-first tree walker with an enter/exit listener protocol.

use crate::ast::Node;

/// Listener invoked around every node during a [`walk`].
///
/// `enter_node` fires before a node's children are visited and its return
/// value controls descent: returning `false` skips both the children and
/// the matching `exit_node`, leaving the listener free to drive that
/// subtree itself.
pub trait AstListener {
    /// Called before a node's children are visited.
    ///
    /// Return `false` to claim the subtree: the walker will not descend
    /// into children and will not call [`Self::exit_node`] for this node.
    fn enter_node(&mut self, node: &Node) -> bool {
        let _ = node;
        true
    }

    /// Called after a node's children have been visited.
    fn exit_node(&mut self, node: &Node) {
        let _ = node;
    }
}

/// Walks the tree depth-first, invoking the listener's enter/exit pair on
/// every node it does not claim.
pub fn walk<L: AstListener>(node: &Node, listener: &mut L) {
    if listener.enter_node(node) {
        node.for_each_child(|child| walk(child, listener));
        listener.exit_node(node);
    }
}
