//! # lasu-base
//!
//! Core library for language-agnostic ASTs: a typed node model, traversal
//! and structural mutation, name resolution, and a declarative engine that
//! turns parse trees into ASTs.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! parse_tree     → ParseNode/Token input, ParseTreeToAstTransformer
//!   ↓
//! transformation → AstTransformer, NodeFactory, SourceNode
//!   ↓
//! validation     → Issue, AstResult
//!   ↓
//! model          → Node/Concept catalogue, Ast arena, walkers, Scope
//!   ↓
//! base           → Point, Position, Source
//! ```

// ============================================================================
// MODULES (dependency order: base → model → validation → transformation → parse_tree)
// ============================================================================

/// Foundation types: Point, Position, Source
pub mod base;

/// Node model: catalogue, arena, traversal, naming
pub mod model;

/// Diagnostics: Issue, AstResult
pub mod validation;

/// Tree-to-AST transformation engine
pub mod transformation;

/// Parse trees as transformation input
pub mod parse_tree;

/// Structural tree comparison for tests
pub mod testing;

// Re-export foundation types
pub use base::{Point, Position, Source};

// Re-export the types most front-ends touch
pub use model::{Ast, Concept, ConceptBuilder, Node, NodeId, NodeType, Origin};
pub use transformation::{AstTransformer, TransformError, TransformerOptions};
pub use validation::{AstResult, Issue};
