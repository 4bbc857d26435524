//! Tree-to-AST transformation.
//!
//! An [`AstTransformer`] maps elements of a source tree (anything
//! implementing [`SourceNode`]) to AST nodes, using one [`NodeFactory`] per
//! source kind:
//! - the factory's constructor builds the node(s) for an element
//! - its child factories say where each containment's source is found
//! - an optional finalizer completes each node once its children are set
//!
//! Kinds without a factory fall back to their super kinds, then to the
//! default factory, then to a [`GenericNode`](crate::model::GenericNode)
//! placeholder with an informational issue.

mod ast_source;
mod error;
mod factory;
mod source;
mod transformer;

pub use ast_source::AstSource;
pub use error::TransformError;
pub use factory::{ChildNodeFactory, IntoNodes, NodeFactory};
pub use source::{SourceChildren, SourceNode};
pub use transformer::{AstTransformer, TransformerOptions};
