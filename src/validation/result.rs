use crate::model::{Ast, NodeId};

use super::issue::Issue;

/// Output of a front-end: the tree (if one could be built) and the issues
/// found along the way.
#[derive(Debug, Default)]
pub struct AstResult {
    pub root: Option<NodeId>,
    pub ast: Ast,
    pub issues: Vec<Issue>,
}

impl AstResult {
    pub fn new(root: Option<NodeId>, ast: Ast, issues: Vec<Issue>) -> Self {
        Self { root, ast, issues }
    }

    /// A tree was produced and no issue is an error
    pub fn is_correct(&self) -> bool {
        self.root.is_some() && !self.issues.iter().any(Issue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }
}
