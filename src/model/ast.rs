//! Arena storage for syntax trees.

use std::rc::Rc;

use crate::base::{Position, Source};

use super::concept::Concept;
use super::error::TreeError;
use super::node::{NewNode, Node, NodeId};
use super::origin::{NodeOrigin, Origin};
use super::value::PropertyValue;

#[derive(Debug)]
struct Entry {
    node: Box<dyn Node>,
    parent: Option<NodeId>,
    origin: Option<Rc<dyn Origin>>,
    position: Option<Position>,
}

/// Arena owning the nodes of one or more trees.
///
/// A node is reachable through its [`NodeId`] until the subtree holding it
/// is dropped (see [`Ast::replace_with`](Ast::replace_with)). The parent link
/// of each node is stored here rather than in the node; it is a cache that
/// [`Ast::assign_parents`](Ast::assign_parents) recomputes from the
/// containment properties.
#[derive(Debug, Default)]
pub struct Ast {
    entries: Vec<Option<Entry>>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    /// Ids of all live nodes, in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(index, _)| NodeId::new(index))
    }

    // ========================================================================
    // INSERTION
    // ========================================================================

    pub fn insert(&mut self, node: impl Node) -> NodeId {
        self.insert_new(NewNode::new(node))
    }

    pub fn insert_boxed(&mut self, node: Box<dyn Node>) -> NodeId {
        self.insert_new(NewNode::boxed(node))
    }

    pub fn insert_new(&mut self, new_node: NewNode) -> NodeId {
        let id = NodeId::new(self.entries.len());
        self.entries.push(Some(Entry {
            node: new_node.node,
            parent: None,
            origin: new_node.origin,
            position: new_node.position,
        }));
        id
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.entries.get(id.index()).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        self.entries.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn get(&self, id: NodeId) -> Option<&dyn Node> {
        self.entry(id).map(|e| e.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut dyn Node> {
        match self.entry_mut(id) {
            Some(entry) => Some(entry.node.as_mut()),
            None => None,
        }
    }

    /// Like [`Ast::get`], but failing with [`TreeError::UnknownNode`]
    pub fn node(&self, id: NodeId) -> Result<&dyn Node, TreeError> {
        self.get(id).ok_or(TreeError::UnknownNode(id))
    }

    pub fn get_as<T: Node>(&self, id: NodeId) -> Option<&T> {
        self.get(id).and_then(|node| node.downcast_ref::<T>())
    }

    pub fn get_as_mut<T: Node>(&mut self, id: NodeId) -> Option<&mut T> {
        self.get_mut(id).and_then(|node| node.downcast_mut::<T>())
    }

    pub fn is<T: Node>(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| node.is::<T>())
    }

    pub fn concept(&self, id: NodeId) -> Option<&'static Concept> {
        self.get(id).map(|node| node.concept())
    }

    pub fn property(&self, id: NodeId, name: &str) -> Option<PropertyValue<'_>> {
        self.get(id).and_then(|node| node.property(name))
    }

    /// Direct children, in catalogue order then list order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        let mut children = Vec::new();
        for property in node.concept().containments() {
            if let Some(PropertyValue::Containment(value)) = node.property(property.name) {
                children.extend(value.iter());
            }
        }
        children
    }

    // ========================================================================
    // ARENA-SIDE METADATA
    // ========================================================================

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.parent)
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(entry) = self.entry_mut(id) {
            entry.parent = parent;
        }
    }

    pub fn origin(&self, id: NodeId) -> Option<&Rc<dyn Origin>> {
        self.entry(id).and_then(|e| e.origin.as_ref())
    }

    pub fn set_origin(&mut self, id: NodeId, origin: Option<Rc<dyn Origin>>) {
        if let Some(entry) = self.entry_mut(id) {
            entry.origin = origin;
        }
    }

    /// The explicit position if one was set, otherwise the origin's
    pub fn position(&self, id: NodeId) -> Option<Position> {
        let entry = self.entry(id)?;
        entry
            .position
            .clone()
            .or_else(|| entry.origin.as_ref().and_then(|o| o.position()))
    }

    pub fn set_position(&mut self, id: NodeId, position: Option<Position>) {
        if let Some(entry) = self.entry_mut(id) {
            entry.position = position;
        }
    }

    pub fn source_text(&self, id: NodeId) -> Option<String> {
        self.origin(id).and_then(|o| o.source_text())
    }

    pub fn source(&self, id: NodeId) -> Option<Source> {
        self.position(id).and_then(|p| p.source)
    }

    /// An origin pointing at `id`, for nodes derived from it
    pub fn node_origin(&self, id: NodeId) -> NodeOrigin {
        NodeOrigin {
            node: id,
            position: self.position(id),
            source_text: self.source_text(id),
        }
    }

    // ========================================================================
    // REMOVAL
    // ========================================================================

    /// Drop the subtree rooted at `root`, keeping nodes for which `keep`
    /// holds (and their subtrees).
    pub(crate) fn drop_subtree(&mut self, root: NodeId, keep: impl Fn(NodeId) -> bool) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if keep(id) {
                continue;
            }
            stack.extend(self.children(id));
            if let Some(slot) = self.entries.get_mut(id.index()) {
                *slot = None;
            }
        }
    }
}
