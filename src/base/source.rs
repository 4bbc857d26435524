use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a piece of code came from. Used for provenance and diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A file on disk
    File(PathBuf),
    /// Code held in memory
    Code(Arc<str>),
    /// A remote resource
    Url(String),
    /// A file inside a named source set (e.g. a project root)
    SourceSetElement {
        source_set: String,
        relative_path: PathBuf,
    },
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn code(code: impl Into<Arc<str>>) -> Self {
        Self::Code(code.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn source_set_element(
        source_set: impl Into<String>,
        relative_path: impl Into<PathBuf>,
    ) -> Self {
        Self::SourceSetElement {
            source_set: source_set.into(),
            relative_path: relative_path.into(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Code(_) => write!(f, "<code>"),
            Source::Url(url) => write!(f, "{url}"),
            Source::SourceSetElement {
                source_set,
                relative_path,
            } => write!(f, "{source_set}:{}", relative_path.display()),
        }
    }
}
