use thiserror::Error;

use crate::model::TreeError;

/// Errors raised while transforming a source tree into an AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("Unable to transform node of kind {kind}: no factory is registered for it")]
    UnmappedSource { kind: String },

    #[error("Mapping error: received collection when value was expected ({kind})")]
    UnexpectedCollection { kind: String },

    #[error("Cannot transform {kind} into a single node, {count} nodes were produced")]
    MultipleNodes { kind: String, count: usize },

    /// A node constructor reported a failure
    #[error("{0}")]
    Constructor(String),

    #[error("{property} could not set child: {reason}")]
    Setter { property: String, reason: String },

    #[error("{concept}.{property} is required but no child node was produced")]
    MissingChild {
        concept: &'static str,
        property: String,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl TransformError {
    pub fn constructor(message: impl Into<String>) -> Self {
        Self::Constructor(message.into())
    }
}
