//! Issues: diagnostics about the input, as opposed to errors of the runtime.

use std::fmt;

use crate::base::Position;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// The phase that found an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueType {
    Lexical,
    Syntactic,
    Semantic,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntactic => "syntactic",
            Self::Semantic => "semantic",
        }
    }
}

/// Severity level of an issue, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum IssueSeverity {
    Info = 10,
    Warning = 20,
    #[default]
    Error = 30,
}

impl IssueSeverity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// ISSUE
// ============================================================================

/// A problem found in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueType,
    pub message: String,
    pub severity: IssueSeverity,
    pub position: Option<Position>,
}

impl Issue {
    pub fn new(kind: IssueType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: IssueSeverity::Error,
            position: None,
        }
    }

    /// Create a lexical error.
    pub fn lexical(message: impl Into<String>) -> Self {
        Self::new(IssueType::Lexical, message)
    }

    /// Create a syntactic error.
    pub fn syntactic(message: impl Into<String>) -> Self {
        Self::new(IssueType::Syntactic, message)
    }

    /// Create a semantic error.
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(IssueType::Semantic, message)
    }

    pub fn with_severity(mut self, severity: IssueSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_position(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.severity.as_str())?;
        if let Some(position) = &self.position {
            write!(f, " at {position}")?;
        }
        write!(f, ": {}", self.message)
    }
}
