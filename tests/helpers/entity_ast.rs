//! AST of the entity language and its transformer.

use std::rc::Rc;

use lasu::model::{
    Ast, ChildSlot, Concept, ConceptBuilder, Node, NodeId, NodeType, PropertyValue,
    ReferenceByName, Role, Scope, Symbol, concept_of,
};
use lasu::parse_tree::{ParseNode, ParseTreeToAstTransformer};
use lasu::validation::AstResult;

use super::entity_lang;

// ============================================================================
// Node types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EModule {
    pub name: String,
    pub entities: Vec<NodeId>,
}

impl NodeType for EModule {
    const NAME: &'static str = "EModule";

    fn describe() -> ConceptBuilder {
        Concept::builder(Self::NAME)
            .attribute("name", "String")
            .children::<EEntity>("entities")
            .role(Role::Named)
    }
}

impl Node for EModule {
    fn concept(&self) -> &'static Concept {
        concept_of::<Self>()
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        match name {
            "name" => Some(PropertyValue::attribute(&self.name)),
            "entities" => Some(PropertyValue::children(&self.entities)),
            _ => None,
        }
    }

    fn child_slot(&mut self, name: &str) -> Option<ChildSlot<'_>> {
        match name {
            "entities" => Some(ChildSlot::Many(&mut self.entities)),
            _ => None,
        }
    }

    fn clone_node(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EEntity {
    pub name: String,
    pub features: Vec<NodeId>,
}

impl EEntity {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            features: Vec::new(),
        }
    }
}

impl NodeType for EEntity {
    const NAME: &'static str = "EEntity";

    fn describe() -> ConceptBuilder {
        Concept::builder(Self::NAME)
            .attribute("name", "String")
            .children::<EFeature>("features")
            .role(Role::EntityDeclaration)
    }
}

impl Node for EEntity {
    fn concept(&self) -> &'static Concept {
        concept_of::<Self>()
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        match name {
            "name" => Some(PropertyValue::attribute(&self.name)),
            "features" => Some(PropertyValue::children(&self.features)),
            _ => None,
        }
    }

    fn child_slot(&mut self, name: &str) -> Option<ChildSlot<'_>> {
        match name {
            "features" => Some(ChildSlot::Many(&mut self.features)),
            _ => None,
        }
    }

    fn clone_node(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EFeature {
    pub name: String,
    pub ty: ReferenceByName<Symbol>,
}

impl NodeType for EFeature {
    const NAME: &'static str = "EFeature";

    fn describe() -> ConceptBuilder {
        Concept::builder(Self::NAME)
            .attribute("name", "String")
            .reference::<EEntity>("ty")
    }
}

impl Node for EFeature {
    fn concept(&self) -> &'static Concept {
        concept_of::<Self>()
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        match name {
            "name" => Some(PropertyValue::attribute(&self.name)),
            "ty" => Some(PropertyValue::Reference(Some(self.ty.view()))),
            _ => None,
        }
    }

    fn clone_node(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}

// ============================================================================
// Transformation
// ============================================================================

fn token_text(node: &Rc<ParseNode>, label: &str) -> String {
    node.token(label).map(|t| t.text.clone()).unwrap_or_default()
}

fn labelled(node: &Rc<ParseNode>, label: &str) -> Vec<Rc<ParseNode>> {
    node.nodes_labelled(label).cloned().collect()
}

pub fn entity_transformer() -> ParseTreeToAstTransformer {
    let mut transformer = ParseTreeToAstTransformer::new();
    transformer
        .register_node_factory("module".into(), |pt: &Rc<ParseNode>| EModule {
            name: token_text(pt, "name"),
            entities: Vec::new(),
        })
        .with_child("entities", |pt: &Rc<ParseNode>| labelled(pt, "entities"));
    transformer
        .register_node_factory("entity".into(), |pt: &Rc<ParseNode>| {
            EEntity::named(&token_text(pt, "name"))
        })
        .with_child("features", |pt: &Rc<ParseNode>| labelled(pt, "features"));
    transformer.register_node_factory("feature".into(), |pt: &Rc<ParseNode>| EFeature {
        name: token_text(pt, "name"),
        ty: ReferenceByName::new(token_text(pt, "type")),
    });
    transformer
}

/// Parse and transform `code`, lexical issues first.
pub fn entity_result(code: &str) -> AstResult {
    let parsed = entity_lang::parse(code);
    let mut transformer = entity_transformer();
    let mut result = match transformer.transform_parsed_code(&parsed.root, code, None) {
        Ok(result) => result,
        Err(error) => panic!("transformation failed: {error}"),
    };
    let mut issues = parsed.lexical_issues;
    issues.append(&mut result.issues);
    result.issues = issues;
    result
}

/// Resolve feature types against the entities of the module.
pub fn resolve_types(ast: &mut Ast, module: NodeId, case_insensitive: bool) -> usize {
    let mut scope = Scope::new();
    for (id, entity) in ast.search_by_type::<EEntity>(module) {
        scope.add(Symbol::for_node(entity.name.clone(), id));
    }
    let features: Vec<NodeId> = ast
        .search_by_type::<EFeature>(module)
        .map(|(id, _)| id)
        .collect();
    let mut unresolved = 0;
    for id in features {
        if let Some(feature) = ast.get_as_mut::<EFeature>(id) {
            if !feature.ty.resolve(&scope, case_insensitive) {
                unresolved += 1;
            }
        }
    }
    unresolved
}

pub fn entity_names(ast: &Ast, module: NodeId) -> Vec<String> {
    ast.search_by_type::<EEntity>(module)
        .map(|(_, entity)| entity.name.clone())
        .collect()
}
