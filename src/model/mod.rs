//! The node model.
//!
//! Trees live in an [`Ast`] arena and refer to each other through
//! [`NodeId`]s. This module provides:
//! - [`Node`] / [`NodeType`] - The node trait and its static catalogue
//! - [`Concept`] - Ordered property catalogue of a node type
//! - [`PropertyValue`] / [`ChildSlot`] - Reading and writing properties by name
//! - [`Origin`] - Provenance of nodes
//! - Walkers and structural mutation on [`Ast`]
//! - [`ReferenceByName`] / [`Scope`] - Name-based linking
//! - [`GenericNode`] / [`GenericErrorNode`] - Placeholders for failed conversions

mod ast;
mod concept;
mod error;
mod generic_nodes;
mod naming;
mod node;
mod origin;
mod processing;
mod traversing;
mod value;

pub use ast::Ast;
pub use concept::{
    Concept, ConceptBuilder, Multiplicity, PropertyDescription, PropertyKind,
    RESERVED_PROPERTY_NAMES, Role, SchemaError, TypeExpr, concept_of, try_concept_of,
};
pub use error::TreeError;
pub use generic_nodes::{GenericErrorNode, GenericNode};
pub use naming::{PossiblyNamed, ReferenceByName, Scope, Symbol};
pub use node::{AsAny, NewNode, Node, NodeId, NodeType};
pub use origin::{CompositeOrigin, JustPosition, NodeOrigin, Origin};
pub use traversing::{Walk, WalkAncestors, WalkLeavesFirst, WalkOrder, WalkWithin};
pub use value::{Attribute, ChildSlot, ChildValue, Children, PropertyValue, ReferenceView};
