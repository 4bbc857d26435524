//! Parse trees as transformation input.
//!
//! Parsers plug into the runtime by building [`ParseNode`] trees:
//! - [`Token`] - A terminal with its text and start point
//! - [`ParseNode`] - A rule application with (optionally labelled) children
//! - [`ParseTreeOrigin`] - Origin of nodes built from a parse-tree node
//! - [`ParseTreeToAstTransformer`] - Transformer keyed by rule name
//!
//! Positions and text of parse nodes are derived from their tokens.

mod node;
mod origin;

pub use node::{ParseChild, ParseNode, Token};
pub use origin::{ParseTreeOrigin, ParseTreeToAstTransformer};
