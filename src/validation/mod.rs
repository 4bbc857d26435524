//! Diagnostics about the input.
//!
//! - [`Issue`] - A lexical, syntactic or semantic problem, with severity
//! - [`AstResult`] - A tree together with the issues found while building it

mod issue;
mod result;

pub use issue::{Issue, IssueSeverity, IssueType};
pub use result::AstResult;
