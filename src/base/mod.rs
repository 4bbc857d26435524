//! Foundation types for the lasu runtime.
//!
//! This module provides the text-coordinate value types used throughout:
//! - [`Point`] - A line/column coordinate
//! - [`Position`] - A start/end range with optional provenance
//! - [`Source`] - Where the code of a position came from
//!
//! This module has NO dependencies on other lasu modules.

mod position;
mod source;

pub use position::{Point, Position, PositionError, pos};
pub use source::Source;
