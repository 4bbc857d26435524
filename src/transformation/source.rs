//! The input side of a transformation.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::model::Origin;

/// An element of the tree being transformed.
///
/// Factories are registered per [`Kind`](SourceNode::Kind): a cheap tag
/// identifying the element's type (a rule name, a concept name...).
pub trait SourceNode: Clone + fmt::Debug {
    type Kind: Clone + Eq + Hash + fmt::Display + fmt::Debug;

    fn kind(&self) -> Self::Kind;

    /// Kinds to fall back on when no factory is registered for
    /// [`kind`](SourceNode::kind), most specific first.
    ///
    /// Lookups are cached per kind, so the chain must depend on the kind
    /// alone.
    fn super_kinds(&self) -> Vec<Self::Kind> {
        Vec::new()
    }

    /// Collections are rejected where a single element is expected.
    fn is_collection(&self) -> bool {
        false
    }

    /// Origin recorded on nodes built from this element
    fn as_origin(&self) -> Option<Rc<dyn Origin>> {
        None
    }

    /// Recover the element an origin was made from, if this kind of source
    /// produced it.
    fn from_origin(_origin: &dyn Origin) -> Option<Self> {
        None
    }
}

/// What a child getter found in a source element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceChildren<S> {
    #[default]
    None,
    One(S),
    Many(Vec<S>),
}

impl<S> SourceChildren<S> {
    pub fn into_vec(self) -> Vec<S> {
        match self {
            SourceChildren::None => Vec::new(),
            SourceChildren::One(source) => vec![source],
            SourceChildren::Many(sources) => sources,
        }
    }
}

impl<S> From<Option<S>> for SourceChildren<S> {
    fn from(source: Option<S>) -> Self {
        source.map_or(SourceChildren::None, SourceChildren::One)
    }
}

impl<S> From<Vec<S>> for SourceChildren<S> {
    fn from(sources: Vec<S>) -> Self {
        SourceChildren::Many(sources)
    }
}
