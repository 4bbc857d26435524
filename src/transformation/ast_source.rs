//! Transforming ASTs into ASTs.

use std::rc::Rc;

use crate::model::{Ast, Children, Node, NodeId, NodeType, Origin, PropertyValue, concept_of};

use super::factory::NodeFactory;
use super::source::{SourceChildren, SourceNode};
use super::transformer::AstTransformer;

/// A node of an existing [`Ast`], used as transformation input.
#[derive(Debug, Clone)]
pub struct AstSource {
    pub ast: Rc<Ast>,
    pub id: NodeId,
}

impl AstSource {
    pub fn new(ast: Rc<Ast>, id: NodeId) -> Self {
        Self { ast, id }
    }

    pub fn node(&self) -> Option<&dyn Node> {
        self.ast.get(self.id)
    }

    fn at(&self, id: NodeId) -> Self {
        Self::new(self.ast.clone(), id)
    }

    /// Sources of the containment `property`, shaped like the property.
    pub fn children(&self, property: &str) -> SourceChildren<AstSource> {
        match self.ast.property(self.id, property) {
            Some(PropertyValue::Containment(Children::One(id))) => SourceChildren::One(self.at(id)),
            Some(PropertyValue::Containment(Children::Maybe(id))) => {
                id.map_or(SourceChildren::None, |id| SourceChildren::One(self.at(id)))
            }
            Some(PropertyValue::Containment(Children::Many(ids))) => {
                SourceChildren::Many(ids.iter().map(|id| self.at(*id)).collect())
            }
            _ => SourceChildren::None,
        }
    }
}

impl SourceNode for AstSource {
    /// Concept name
    type Kind = &'static str;

    fn kind(&self) -> &'static str {
        self.node().map_or("", |node| node.concept().name())
    }

    fn super_kinds(&self) -> Vec<&'static str> {
        self.node()
            .map(|node| node.concept().ancestors().to_vec())
            .unwrap_or_default()
    }

    fn as_origin(&self) -> Option<Rc<dyn Origin>> {
        Some(Rc::new(self.ast.node_origin(self.id)))
    }
}

impl AstTransformer<AstSource> {
    /// Copy nodes of type `N` as they are, transforming their children.
    ///
    /// Resolved references are copied as-is and keep pointing into the
    /// source tree.
    pub fn register_identity_transformation<N: NodeType>(&mut self) -> &NodeFactory<AstSource> {
        let factory = self.register_node_factory(N::NAME, |source: &AstSource| {
            source.node().map(|node| node.clone_node())
        });
        for property in concept_of::<N>().containments() {
            let name = property.name;
            factory.with_child(name, move |source: &AstSource| source.children(name));
        }
        factory
    }
}
