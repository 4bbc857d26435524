//! Node factories: how one kind of source element becomes AST nodes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::model::{ChildValue, NewNode, Node, NodeType, TreeError};

use super::error::TransformError;
use super::source::{SourceChildren, SourceNode};
use super::transformer::AstTransformer;

pub(crate) type Constructor<S> = Box<
    dyn Fn(&S, &mut AstTransformer<S>, &NodeFactory<S>) -> Result<Vec<NewNode>, TransformError>,
>;
type ChildGetter<S> = Box<dyn Fn(&S) -> SourceChildren<S>>;
type ChildSetter = Box<dyn Fn(&mut dyn Node, ChildValue) -> Result<(), TransformError>>;
type Finalizer = Box<dyn Fn(&mut dyn Node)>;

// ============================================================================
// CONSTRUCTOR OUTPUT
// ============================================================================

/// Values a node constructor may return.
///
/// A constructor produces zero, one or several nodes; returning `Err`
/// reports a failed conversion.
pub trait IntoNodes {
    fn into_nodes(self) -> Result<Vec<NewNode>, TransformError>;
}

impl<N: Node> IntoNodes for N {
    fn into_nodes(self) -> Result<Vec<NewNode>, TransformError> {
        Ok(vec![NewNode::new(self)])
    }
}

impl IntoNodes for NewNode {
    fn into_nodes(self) -> Result<Vec<NewNode>, TransformError> {
        Ok(vec![self])
    }
}

impl IntoNodes for Box<dyn Node> {
    fn into_nodes(self) -> Result<Vec<NewNode>, TransformError> {
        Ok(vec![NewNode::boxed(self)])
    }
}

impl<T: IntoNodes> IntoNodes for Option<T> {
    fn into_nodes(self) -> Result<Vec<NewNode>, TransformError> {
        self.map_or_else(|| Ok(Vec::new()), IntoNodes::into_nodes)
    }
}

impl<T: IntoNodes> IntoNodes for Vec<T> {
    fn into_nodes(self) -> Result<Vec<NewNode>, TransformError> {
        let mut nodes = Vec::with_capacity(self.len());
        for item in self {
            nodes.extend(item.into_nodes()?);
        }
        Ok(nodes)
    }
}

impl<T: IntoNodes, E: fmt::Display> IntoNodes for Result<T, E> {
    fn into_nodes(self) -> Result<Vec<NewNode>, TransformError> {
        match self {
            Ok(value) => value.into_nodes(),
            Err(error) => Err(TransformError::Constructor(error.to_string())),
        }
    }
}

// ============================================================================
// CHILD FACTORIES
// ============================================================================

/// Extracts the source of a child property and stores the transformed
/// result on the parent node.
pub struct ChildNodeFactory<S> {
    name: String,
    get: ChildGetter<S>,
    setter: ChildSetter,
}

impl<S> ChildNodeFactory<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, source: &S) -> SourceChildren<S> {
        (self.get)(source)
    }

    pub fn set(&self, node: &mut dyn Node, value: ChildValue) -> Result<(), TransformError> {
        (self.setter)(node, value)
    }
}

impl<S> fmt::Debug for ChildNodeFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildNodeFactory")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

enum ChildEntry<S> {
    Factory(Rc<ChildNodeFactory<S>>),
    /// Known not to be a child with a factory
    NoChildNode,
}

/// Writes through [`Node::child_slot`].
fn slot_setter(property: String) -> ChildSetter {
    Box::new(move |node: &mut dyn Node, value: ChildValue| {
        let concept = node.concept().name();
        let slot = node
            .child_slot(&property)
            .ok_or_else(|| TreeError::SlotNotFound {
                concept,
                property: property.clone(),
            })?;
        slot.assign(value).map_err(|error| match error {
            TreeError::MissingRequiredChild => TransformError::MissingChild {
                concept,
                property: property.clone(),
            },
            other => TransformError::Setter {
                property: property.clone(),
                reason: other.to_string(),
            },
        })
    })
}

// ============================================================================
// NODE FACTORY
// ============================================================================

/// Builds the nodes for one source kind and wires their children.
///
/// Builder methods take `&self` so they can be chained on the reference
/// returned at registration.
pub struct NodeFactory<S: SourceNode> {
    constructor: Constructor<S>,
    children: RefCell<IndexMap<String, ChildEntry<S>>>,
    finalizer: RefCell<Option<Finalizer>>,
}

impl<S: SourceNode> fmt::Debug for NodeFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children: Vec<String> = self.children.borrow().keys().cloned().collect();
        f.debug_struct("NodeFactory")
            .field("children", &children)
            .finish_non_exhaustive()
    }
}

impl<S: SourceNode + 'static> NodeFactory<S> {
    pub(crate) fn new(constructor: Constructor<S>) -> Self {
        Self {
            constructor,
            children: RefCell::new(IndexMap::new()),
            finalizer: RefCell::new(None),
        }
    }

    fn add_child(&self, key: String, child: ChildNodeFactory<S>) -> &Self {
        self.children
            .borrow_mut()
            .insert(key, ChildEntry::Factory(Rc::new(child)));
        self
    }

    /// Fill the containment `name` of every node built by this factory
    /// with the transformation of `getter(source)`.
    pub fn with_child<G, R>(&self, name: &str, getter: G) -> &Self
    where
        G: Fn(&S) -> R + 'static,
        R: Into<SourceChildren<S>>,
    {
        self.add_child(
            name.to_string(),
            ChildNodeFactory {
                name: name.to_string(),
                get: Box::new(move |source| getter(source).into()),
                setter: slot_setter(name.to_string()),
            },
        )
    }

    /// Like [`with_child`](Self::with_child), but only for nodes of type
    /// `N`. Takes precedence over a plain registration of the same name.
    pub fn with_child_for<N, G, R>(&self, name: &str, getter: G) -> &Self
    where
        N: NodeType,
        G: Fn(&S) -> R + 'static,
        R: Into<SourceChildren<S>>,
    {
        let key = format!("{}#{name}", N::NAME);
        self.add_child(
            key.clone(),
            ChildNodeFactory {
                name: key,
                get: Box::new(move |source| getter(source).into()),
                setter: slot_setter(name.to_string()),
            },
        )
    }

    /// Register a child with a custom setter, for properties that are not
    /// exposed as child slots (references, derived fields...).
    pub fn with_child_setter<N, G, R, F>(&self, name: &str, getter: G, setter: F) -> &Self
    where
        N: Node,
        G: Fn(&S) -> R + 'static,
        R: Into<SourceChildren<S>>,
        F: Fn(&mut N, ChildValue) + 'static,
    {
        let property = name.to_string();
        self.add_child(
            name.to_string(),
            ChildNodeFactory {
                name: name.to_string(),
                get: Box::new(move |source| getter(source).into()),
                setter: Box::new(move |node: &mut dyn Node, value| {
                    let concept = node.concept().name();
                    let node = node
                        .downcast_mut::<N>()
                        .ok_or_else(|| TransformError::Setter {
                            property: property.clone(),
                            reason: format!(
                                "node of type {concept} is not a {}",
                                std::any::type_name::<N>()
                            ),
                        })?;
                    setter(node, value);
                    Ok(())
                }),
            },
        )
    }

    /// Run `finalizer` on each node of type `N` built by this factory, once
    /// its children are set. Replaces any previous finalizer.
    pub fn with_finalizer<N, F>(&self, finalizer: F) -> &Self
    where
        N: Node,
        F: Fn(&mut N) + 'static,
    {
        *self.finalizer.borrow_mut() = Some(Box::new(move |node: &mut dyn Node| {
            if let Some(node) = node.downcast_mut::<N>() {
                finalizer(node);
            }
        }));
        self
    }

    pub(crate) fn construct(
        &self,
        source: &S,
        transformer: &mut AstTransformer<S>,
    ) -> Result<Vec<NewNode>, TransformError> {
        (self.constructor)(source, transformer, self)
    }

    /// The child factory for `property` of nodes of type `concept`.
    ///
    /// Looks up `Concept#property` then `property`; misses are remembered
    /// under the qualified key.
    pub(crate) fn child_factory(
        &self,
        concept: &str,
        property: &str,
    ) -> Option<Rc<ChildNodeFactory<S>>> {
        let qualified = format!("{concept}#{property}");
        let mut children = self.children.borrow_mut();
        let entry = children
            .get(&qualified)
            .or_else(|| children.get(property));
        match entry {
            Some(ChildEntry::Factory(factory)) => Some(factory.clone()),
            Some(ChildEntry::NoChildNode) => None,
            None => {
                children.insert(qualified, ChildEntry::NoChildNode);
                None
            }
        }
    }

    pub(crate) fn finalize(&self, node: &mut dyn Node) {
        if let Some(finalizer) = self.finalizer.borrow().as_ref() {
            finalizer(node);
        }
    }
}
