//! The node trait and arena handles.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::base::Position;

use super::concept::{Concept, ConceptBuilder};
use super::origin::Origin;
use super::value::{ChildSlot, PropertyValue};

/// Identifier of a node inside an [`Ast`](super::Ast) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Upcast to [`Any`] for typed access through `dyn` handles.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A node of an abstract syntax tree.
///
/// Implementations are plain data: child nodes are stored as [`NodeId`]s of
/// the arena that owns them, while parent, origin and position live in the
/// arena entry. The catalogue returned by [`Node::concept`] tells generic
/// code which members exist and what they mean; [`Node::property`] and
/// [`Node::child_slot`] give access to their values by name.
pub trait Node: AsAny + fmt::Debug + 'static {
    /// Catalogue of this node's type
    fn concept(&self) -> &'static Concept;

    /// Value of the catalogue property `name`
    fn property(&self, name: &str) -> Option<PropertyValue<'_>>;

    /// Writable access to the containment property `name`
    ///
    /// Types without containments can keep the default.
    fn child_slot(&mut self, _name: &str) -> Option<ChildSlot<'_>> {
        None
    }

    /// Copy of this node. Child ids are copied as-is.
    fn clone_node(&self) -> Box<dyn Node>;
}

impl dyn Node {
    pub fn is<T: Node>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Node>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// A node type with a statically declared catalogue.
pub trait NodeType: Node + Sized {
    /// Concept name, unique among the node types of a language
    const NAME: &'static str;

    /// Declare the members of this type, in declaration order.
    fn describe() -> ConceptBuilder;
}

/// A node not yet inserted in an arena, with its arena-side metadata.
#[derive(Debug)]
pub struct NewNode {
    pub(crate) node: Box<dyn Node>,
    pub(crate) origin: Option<Rc<dyn Origin>>,
    pub(crate) position: Option<Position>,
}

impl NewNode {
    pub fn new(node: impl Node) -> Self {
        Self::boxed(Box::new(node))
    }

    pub fn boxed(node: Box<dyn Node>) -> Self {
        Self {
            node,
            origin: None,
            position: None,
        }
    }

    pub fn with_origin(mut self, origin: Rc<dyn Origin>) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Explicit position, taking precedence over the origin's
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn node(&self) -> &dyn Node {
        self.node.as_ref()
    }

    pub fn origin(&self) -> Option<&Rc<dyn Origin>> {
        self.origin.as_ref()
    }
}

impl<N: Node> From<N> for NewNode {
    fn from(node: N) -> Self {
        NewNode::new(node)
    }
}

impl From<Box<dyn Node>> for NewNode {
    fn from(node: Box<dyn Node>) -> Self {
        NewNode::boxed(node)
    }
}
