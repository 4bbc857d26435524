//! Tree walkers.
//!
//! All walkers are lazy and iterative, so deep trees do not exhaust the
//! stack. They read the children of each node when it is reached; mutating
//! the tree while a walk is in progress is prevented by the borrow on the
//! [`Ast`].

use crate::base::Position;

use super::ast::Ast;
use super::concept::Role;
use super::node::{Node, NodeId};

/// Order used by [`Ast::walk_descendants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkOrder {
    /// Parents before their children
    #[default]
    DepthFirst,
    /// Children before their parents
    LeavesFirst,
}

/// Pre-order walk. See [`Ast::walk`].
pub struct Walk<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let id = self.stack.pop()?;
            if !self.ast.contains(id) {
                continue;
            }
            self.stack.extend(self.ast.children(id).into_iter().rev());
            return Some(id);
        }
    }
}

/// Post-order walk. See [`Ast::walk_leaves_first`].
pub struct WalkLeavesFirst<'a> {
    ast: &'a Ast,
    stack: Vec<(NodeId, bool)>,
}

impl Iterator for WalkLeavesFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let (id, expanded) = self.stack.pop()?;
            if expanded {
                return Some(id);
            }
            if !self.ast.contains(id) {
                continue;
            }
            self.stack.push((id, true));
            self.stack.extend(
                self.ast
                    .children(id)
                    .into_iter()
                    .rev()
                    .map(|child| (child, false)),
            );
        }
    }
}

/// Position-scoped walk. See [`Ast::walk_within`].
pub struct WalkWithin<'a> {
    ast: &'a Ast,
    position: Position,
    stack: Vec<NodeId>,
}

impl Iterator for WalkWithin<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let id = self.stack.pop()?;
            // Nodes without a position prune their subtree
            let Some(node_position) = self.ast.position(id) else {
                continue;
            };
            if self.position.contains(&node_position) {
                self.stack.extend(self.ast.children(id).into_iter().rev());
                return Some(id);
            }
            if node_position.contains(&self.position) {
                self.stack.extend(self.ast.children(id).into_iter().rev());
            }
        }
    }
}

/// Parent chain, nearest first. See [`Ast::walk_ancestors`].
pub struct WalkAncestors<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for WalkAncestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.ast.parent(id);
        Some(id)
    }
}

impl Ast {
    /// `root` and all its descendants, depth-first, parents before children.
    pub fn walk(&self, root: NodeId) -> Walk<'_> {
        Walk {
            ast: self,
            stack: vec![root],
        }
    }

    /// `root` and all its descendants, children before their parent.
    pub fn walk_leaves_first(&self, root: NodeId) -> WalkLeavesFirst<'_> {
        WalkLeavesFirst {
            ast: self,
            stack: vec![(root, false)],
        }
    }

    /// Nodes under `root` whose position lies within `position`, in
    /// depth-first order.
    ///
    /// Subtrees that neither lie within nor contain `position` are skipped,
    /// as are nodes with no position.
    pub fn walk_within(&self, root: NodeId, position: &Position) -> WalkWithin<'_> {
        WalkWithin {
            ast: self,
            position: position.clone(),
            stack: vec![root],
        }
    }

    /// Parent, grandparent, ... of `id`, following the parent links.
    pub fn walk_ancestors(&self, id: NodeId) -> WalkAncestors<'_> {
        WalkAncestors {
            ast: self,
            next: self.parent(id),
        }
    }

    /// Descendants of `root`, excluding `root` itself.
    pub fn walk_descendants(
        &self,
        root: NodeId,
        order: WalkOrder,
    ) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match order {
            WalkOrder::DepthFirst => Box::new(self.walk(root).filter(move |id| *id != root)),
            WalkOrder::LeavesFirst => {
                Box::new(self.walk_leaves_first(root).filter(move |id| *id != root))
            }
        }
    }

    /// Descendants of `root` that are of type `T`.
    pub fn walk_descendants_of_type<T: Node>(
        &self,
        root: NodeId,
        order: WalkOrder,
    ) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.walk_descendants(root, order)
            .filter_map(move |id| self.get_as::<T>(id).map(|node| (id, node)))
    }

    /// `root` and its descendants that are of type `T`, depth-first.
    pub fn search_by_type<T: Node>(&self, root: NodeId) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.walk(root)
            .filter_map(move |id| self.get_as::<T>(id).map(|node| (id, node)))
    }

    /// The nearest ancestor satisfying `predicate`.
    pub fn find_ancestor(
        &self,
        id: NodeId,
        predicate: impl Fn(&dyn Node) -> bool,
    ) -> Option<NodeId> {
        self.walk_ancestors(id)
            .find(|ancestor| self.get(*ancestor).is_some_and(&predicate))
    }

    /// The nearest ancestor of type `T`.
    pub fn find_ancestor_of_type<T: Node>(&self, id: NodeId) -> Option<(NodeId, &T)> {
        self.walk_ancestors(id)
            .find_map(|ancestor| self.get_as::<T>(ancestor).map(|node| (ancestor, node)))
    }

    /// The nearest ancestor whose type declares `role`.
    pub fn find_ancestor_with_role(&self, id: NodeId, role: Role) -> Option<NodeId> {
        self.find_ancestor(id, |node| node.concept().has_role(role))
    }
}
