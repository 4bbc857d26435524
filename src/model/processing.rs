//! Structural mutation of trees.

use rustc_hash::FxHashSet;
use tracing::trace;

use super::ast::Ast;
use super::error::TreeError;
use super::node::NodeId;

impl Ast {
    /// Set the parent link of every node under `root` from the containment
    /// properties. `root`'s own parent is left untouched.
    pub fn assign_parents(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            for child in self.children(parent) {
                self.set_parent(child, Some(parent));
                stack.push(child);
            }
        }
    }

    /// Replace every direct child `c` of `id` with `f(c)`, keeping the
    /// shape of each containment property.
    ///
    /// Parent links are not updated.
    pub fn transform_children(
        &mut self,
        id: NodeId,
        mut f: impl FnMut(NodeId) -> NodeId,
    ) -> Result<(), TreeError> {
        let node = self.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        let concept = node.concept();
        for property in concept.containments() {
            let slot = node
                .child_slot(property.name)
                .ok_or_else(|| TreeError::SlotNotFound {
                    concept: concept.name(),
                    property: property.name.to_string(),
                })?;
            slot.map(&mut f);
        }
        Ok(())
    }

    /// Put `other` in the place `id` holds in its parent.
    ///
    /// `other` becomes a child of that parent and `id` is dropped from the
    /// arena together with its subtree, except for any part of it that is
    /// reused under `other`.
    pub fn replace_with(&mut self, id: NodeId, other: NodeId) -> Result<(), TreeError> {
        if id == other {
            return Ok(());
        }
        if !self.contains(other) {
            return Err(TreeError::UnknownNode(other));
        }
        let parent = self.parent(id).ok_or(TreeError::NoParent(id))?;
        trace!("[REPLACE] {id} -> {other} under {parent}");
        self.transform_children(parent, |child| if child == id { other } else { child })?;
        self.set_parent(other, Some(parent));

        let kept: FxHashSet<NodeId> = self.walk(other).collect();
        self.drop_subtree(id, |n| kept.contains(&n));
        Ok(())
    }
}
