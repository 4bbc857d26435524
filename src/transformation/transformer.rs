//! The transformation engine.

use std::collections::hash_map::Entry;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::model::{
    Ast, ChildValue, GenericErrorNode, GenericNode, Multiplicity, NewNode, Node, NodeId,
    PropertyDescription, TreeError,
};
use crate::validation::{AstResult, Issue, IssueSeverity};

use super::error::TransformError;
use super::factory::{IntoNodes, NodeFactory};
use super::source::{SourceChildren, SourceNode};

/// Settings of an [`AstTransformer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformerOptions {
    /// Produce placeholder nodes instead of failing on unmapped or
    /// unconvertible source elements
    pub allow_generic_node: bool,
    /// Assign parent links in [`AstTransformer::transform_to_result`]
    pub assign_parents: bool,
}

impl Default for TransformerOptions {
    fn default() -> Self {
        Self {
            allow_generic_node: true,
            assign_parents: true,
        }
    }
}

impl TransformerOptions {
    pub fn allow_generic_node(mut self, allow: bool) -> Self {
        self.allow_generic_node = allow;
        self
    }

    pub fn assign_parents(mut self, assign: bool) -> Self {
        self.assign_parents = assign;
        self
    }
}

/// Transforms trees of `S` into an [`Ast`], driven by the factories
/// registered per source kind.
///
/// Issues found along the way accumulate until [`clear_issues`] is called.
///
/// [`clear_issues`]: AstTransformer::clear_issues
pub struct AstTransformer<S: SourceNode> {
    factories: FxHashMap<S::Kind, Rc<NodeFactory<S>>>,
    default_factory: Option<Rc<NodeFactory<S>>>,
    /// Factory found for kinds with no direct registration
    resolved: FxHashMap<S::Kind, Option<Rc<NodeFactory<S>>>>,
    issues: Vec<Issue>,
    options: TransformerOptions,
    ast: Ast,
}

impl<S: SourceNode> fmt::Debug for AstTransformer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstTransformer")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .field("issues", &self.issues)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: SourceNode + 'static> Default for AstTransformer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SourceNode + 'static> AstTransformer<S> {
    pub fn new() -> Self {
        Self::with_options(TransformerOptions::default())
    }

    pub fn with_options(options: TransformerOptions) -> Self {
        Self {
            factories: FxHashMap::default(),
            default_factory: None,
            resolved: FxHashMap::default(),
            issues: Vec::new(),
            options,
            ast: Ast::new(),
        }
    }

    pub fn options(&self) -> TransformerOptions {
        self.options
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn clear_issues(&mut self) {
        self.issues.clear();
    }

    /// The tree built so far
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Hand over the tree built so far, leaving an empty one.
    pub fn take_ast(&mut self) -> Ast {
        std::mem::take(&mut self.ast)
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    fn install(&mut self, kind: S::Kind, factory: NodeFactory<S>) -> &NodeFactory<S> {
        trace!("[TRANSFORM] registering factory for {kind:?}");
        self.resolved.clear();
        let factory = Rc::new(factory);
        match self.factories.entry(kind) {
            Entry::Occupied(mut entry) => {
                entry.insert(factory);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(factory),
        }
    }

    /// Build nodes for `kind` with `constructor(source)`.
    pub fn register_node_factory<F, R>(
        &mut self,
        kind: S::Kind,
        constructor: F,
    ) -> &NodeFactory<S>
    where
        F: Fn(&S) -> R + 'static,
        R: IntoNodes,
    {
        let factory =
            NodeFactory::new(Box::new(move |source, _, _| constructor(source).into_nodes()));
        self.install(kind, factory)
    }

    /// Build nodes for `kind` with `constructor(source, transformer)`, so
    /// the constructor can transform parts of the source itself.
    pub fn register_node_factory_with<F, R>(
        &mut self,
        kind: S::Kind,
        constructor: F,
    ) -> &NodeFactory<S>
    where
        F: Fn(&S, &mut AstTransformer<S>) -> R + 'static,
        R: IntoNodes,
    {
        let factory = NodeFactory::new(Box::new(move |source, transformer, _| {
            constructor(source, transformer).into_nodes()
        }));
        self.install(kind, factory)
    }

    /// Build nodes for `kind` with `constructor(source, transformer, factory)`.
    pub fn register_node_factory_full<F, R>(
        &mut self,
        kind: S::Kind,
        constructor: F,
    ) -> &NodeFactory<S>
    where
        F: Fn(&S, &mut AstTransformer<S>, &NodeFactory<S>) -> R + 'static,
        R: IntoNodes,
    {
        let factory = NodeFactory::new(Box::new(move |source, transformer, factory| {
            constructor(source, transformer, factory).into_nodes()
        }));
        self.install(kind, factory)
    }

    /// Build a default `N` for `kind`; its children come from the child
    /// factories registered on the returned factory.
    pub fn register_node_type<N>(&mut self, kind: S::Kind) -> &NodeFactory<S>
    where
        N: Node + Default,
    {
        self.register_node_factory(kind, |_| N::default())
    }

    /// Factory used for kinds with no registration of their own (or of any
    /// of their super kinds).
    pub fn register_default_factory<F, R>(&mut self, constructor: F) -> &NodeFactory<S>
    where
        F: Fn(&S, &mut AstTransformer<S>) -> R + 'static,
        R: IntoNodes,
    {
        self.resolved.clear();
        let factory = Rc::new(NodeFactory::new(Box::new(move |source, transformer, _| {
            constructor(source, transformer).into_nodes()
        })));
        self.default_factory.insert(factory)
    }

    fn node_factory(&mut self, source: &S) -> Option<Rc<NodeFactory<S>>> {
        let kind = source.kind();
        if let Some(factory) = self.factories.get(&kind) {
            return Some(factory.clone());
        }
        if let Some(cached) = self.resolved.get(&kind) {
            return cached.clone();
        }
        let found = source
            .super_kinds()
            .iter()
            .find_map(|k| self.factories.get(k).cloned())
            .or_else(|| self.default_factory.clone());
        self.resolved.insert(kind, found.clone());
        found
    }

    // ========================================================================
    // TRANSFORMATION
    // ========================================================================

    /// Transform `source` into zero or more nodes, children included.
    ///
    /// The new nodes get `parent` as their parent link.
    pub fn transform_into_nodes(
        &mut self,
        source: Option<&S>,
        parent: Option<NodeId>,
    ) -> Result<Vec<NodeId>, TransformError> {
        let Some(source) = source else {
            return Ok(Vec::new());
        };
        if source.is_collection() {
            return Err(TransformError::UnexpectedCollection {
                kind: source.kind().to_string(),
            });
        }
        let Some(factory) = self.node_factory(source) else {
            return self.generic_node(source, parent);
        };

        let mut ids = Vec::new();
        for new_node in self.make_nodes(&factory, source)? {
            let id = self.ast.insert_new(new_node);
            let concept = self.ast.node(id)?.concept();
            for property in concept.properties().iter().filter(|p| !p.is_attribute()) {
                self.process_child(source, id, property, &factory)?;
            }
            if let Some(node) = self.ast.get_mut(id) {
                factory.finalize(node);
            }
            self.ast.set_parent(id, parent);
            ids.push(id);
        }
        Ok(ids)
    }

    /// Transform `source` into at most one node.
    pub fn transform(
        &mut self,
        source: Option<&S>,
        parent: Option<NodeId>,
    ) -> Result<Option<NodeId>, TransformError> {
        let ids = self.transform_into_nodes(source, parent)?;
        match ids.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(TransformError::MultipleNodes {
                kind: source.map(|s| s.kind().to_string()).unwrap_or_default(),
                count: ids.len(),
            }),
        }
    }

    /// Transform a whole tree and package it with the issues found so far.
    ///
    /// The tree is taken out of the transformer; issues are copied.
    pub fn transform_to_result(&mut self, source: &S) -> Result<AstResult, TransformError> {
        let root = self.transform(Some(source), None)?;
        if self.options.assign_parents {
            if let Some(root) = root {
                self.ast.assign_parents(root);
            }
        }
        debug!(
            "[TRANSFORM] built {} nodes with {} issues",
            self.ast.len(),
            self.issues.len()
        );
        Ok(AstResult::new(root, self.take_ast(), self.issues.clone()))
    }

    fn make_nodes(
        &mut self,
        factory: &NodeFactory<S>,
        source: &S,
    ) -> Result<Vec<NewNode>, TransformError> {
        match factory.construct(source, self) {
            Ok(mut nodes) => {
                for node in nodes.iter_mut().filter(|n| n.origin.is_none()) {
                    node.origin = source.as_origin();
                }
                Ok(nodes)
            }
            Err(error) if self.options.allow_generic_node => {
                warn!("[TRANSFORM] failed to build node for {}: {error}", source.kind());
                let mut node = NewNode::new(GenericErrorNode::from_error(&error));
                node.origin = source.as_origin();
                Ok(vec![node])
            }
            Err(error) => Err(error),
        }
    }

    fn generic_node(
        &mut self,
        source: &S,
        parent: Option<NodeId>,
    ) -> Result<Vec<NodeId>, TransformError> {
        let kind = source.kind().to_string();
        if !self.options.allow_generic_node {
            return Err(TransformError::UnmappedSource { kind });
        }
        debug!("[TRANSFORM] no factory for {kind}, using a generic node");
        let mut node = NewNode::new(GenericNode);
        node.origin = source.as_origin();
        let position = node.origin.as_ref().and_then(|o| o.position());
        let id = self.ast.insert_new(node);
        self.ast.set_parent(id, parent);
        self.issues.push(
            Issue::semantic(format!("Source node not mapped: {kind}"))
                .with_severity(IssueSeverity::Info)
                .with_position(position),
        );
        Ok(vec![id])
    }

    /// Placeholder child standing for a required child that could not be
    /// produced.
    fn error_node(&mut self, error: &TransformError, source: &S, parent: NodeId) -> NodeId {
        warn!("[TRANSFORM] {error}, using an error node");
        let mut node = NewNode::new(GenericErrorNode::from_error(error));
        node.origin = source.as_origin();
        let id = self.ast.insert_new(node);
        self.ast.set_parent(id, Some(parent));
        id
    }

    /// The source to read children from: the element the node's origin
    /// points back to, if it can be recovered, else `source`.
    fn child_source(&self, id: NodeId, source: &S) -> S {
        self.ast
            .origin(id)
            .and_then(|origin| S::from_origin(&**origin))
            .unwrap_or_else(|| source.clone())
    }

    fn process_child(
        &mut self,
        source: &S,
        id: NodeId,
        property: &PropertyDescription,
        factory: &NodeFactory<S>,
    ) -> Result<(), TransformError> {
        let concept = self.ast.node(id)?.concept();
        let Some(child_factory) = factory.child_factory(concept.name(), property.name) else {
            return Ok(());
        };
        let child_source = self.child_source(id, source);
        let children = child_factory.get(&child_source);
        trace!(
            "[TRANSFORM] {}.{} <- {}",
            concept.name(),
            property.name,
            child_factory.name()
        );

        let value = if property.is_multiple() {
            let mut ids = Vec::new();
            for child in children.into_vec() {
                ids.extend(self.transform_into_nodes(Some(&child), Some(id))?);
            }
            ChildValue::Many(ids)
        } else {
            let child = match children {
                SourceChildren::None => None,
                SourceChildren::One(child) => self.transform(Some(&child), Some(id))?,
                SourceChildren::Many(_) => {
                    return Err(TransformError::UnexpectedCollection {
                        kind: format!("{}.{}", concept.name(), property.name),
                    });
                }
            };
            let required =
                property.is_containment() && property.multiplicity == Multiplicity::Singular;
            match child {
                None if required && self.options.allow_generic_node => {
                    let error = TransformError::MissingChild {
                        concept: concept.name(),
                        property: property.name.to_string(),
                    };
                    ChildValue::Single(Some(self.error_node(&error, &child_source, id)))
                }
                child => ChildValue::Single(child),
            }
        };
        let node = self.ast.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        child_factory.set(node, value)
    }
}
