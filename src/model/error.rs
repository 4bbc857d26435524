use thiserror::Error;

use super::node::NodeId;

/// Errors raised by tree queries and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} is not in this tree")]
    UnknownNode(NodeId),

    #[error("node {0} has no parent")]
    NoParent(NodeId),

    #[error("{concept}.{property} is not a writable containment")]
    SlotNotFound {
        concept: &'static str,
        property: String,
    },

    #[error("a required child cannot be set to none")]
    MissingRequiredChild,

    #[error("expected at most one child, got {0}")]
    TooManyChildren(usize),
}
