//! Placeholder nodes produced when a source element cannot be converted.

use std::fmt;

use super::concept::{Concept, ConceptBuilder, Role, TypeExpr, concept_of};
use super::node::{Node, NodeType};
use super::value::PropertyValue;

/// Stands in for a source element no factory is registered for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericNode;

impl NodeType for GenericNode {
    const NAME: &'static str = "GenericNode";

    fn describe() -> ConceptBuilder {
        Concept::builder(Self::NAME).role(Role::PlaceholderElement)
    }
}

impl Node for GenericNode {
    fn concept(&self) -> &'static Concept {
        concept_of::<Self>()
    }

    fn property(&self, _name: &str) -> Option<PropertyValue<'_>> {
        None
    }

    fn clone_node(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}

/// Stands in for a source element whose conversion failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericErrorNode {
    pub message: String,
    /// Text of the underlying error, if any
    pub error: Option<String>,
}

impl GenericErrorNode {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    /// Node for a failed conversion. The message is `Exception <error>`.
    pub fn from_error<E: fmt::Display + ?Sized>(error: &E) -> Self {
        let error = error.to_string();
        Self {
            message: format!("Exception {error}"),
            error: Some(error),
        }
    }
}

impl NodeType for GenericErrorNode {
    const NAME: &'static str = "GenericErrorNode";

    fn describe() -> ConceptBuilder {
        Concept::builder(Self::NAME)
            .attribute("message", "String")
            .property("error", TypeExpr::optional(TypeExpr::value("String")))
            .internal("error")
            .role(Role::Error)
    }
}

impl Node for GenericErrorNode {
    fn concept(&self) -> &'static Concept {
        concept_of::<Self>()
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        match name {
            "message" => Some(PropertyValue::attribute(&self.message)),
            _ => None,
        }
    }

    fn clone_node(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}
