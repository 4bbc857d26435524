//! Names, by-name references and symbol scopes.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::trace;

use super::node::NodeId;
use super::value::ReferenceView;

/// Something that may carry a name.
pub trait PossiblyNamed {
    fn name(&self) -> Option<&str>;
}

impl<T: PossiblyNamed + ?Sized> PossiblyNamed for &T {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

impl<T: PossiblyNamed + ?Sized> PossiblyNamed for Rc<T> {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

fn names_match(candidate: &str, name: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        candidate.to_lowercase() == name.to_lowercase()
    } else {
        candidate == name
    }
}

// ============================================================================
// REFERENCES
// ============================================================================

/// A link to a named element, resolved after construction.
///
/// The target is not owned: for node targets store a [`NodeId`] or a
/// [`Symbol`]. Only the name takes part in structural comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceByName<T> {
    pub name: String,
    pub referred: Option<T>,
}

impl<T> ReferenceByName<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referred: None,
        }
    }

    pub fn resolved(name: impl Into<String>, referred: T) -> Self {
        Self {
            name: name.into(),
            referred: Some(referred),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.referred.is_some()
    }

    pub fn view(&self) -> ReferenceView<'_> {
        ReferenceView {
            name: &self.name,
            resolved: self.is_resolved(),
        }
    }

    /// Resolve against the first candidate whose name (as given by
    /// `name_of`) matches. Returns whether the reference is now resolved;
    /// on failure `referred` is cleared.
    pub fn try_to_resolve_by<I, F, N>(
        &mut self,
        candidates: I,
        mut name_of: F,
        case_insensitive: bool,
    ) -> bool
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> Option<N>,
        N: AsRef<str>,
    {
        self.referred = candidates.into_iter().find(|candidate| {
            name_of(candidate)
                .is_some_and(|n| names_match(n.as_ref(), &self.name, case_insensitive))
        });
        trace!(
            "[RESOLVE] '{}' {}",
            self.name,
            if self.is_resolved() { "solved" } else { "unsolved" }
        );
        self.is_resolved()
    }
}

impl<T: PossiblyNamed> ReferenceByName<T> {
    /// Resolve against the first candidate with a matching name.
    pub fn try_to_resolve<I>(&mut self, candidates: I, case_insensitive: bool) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.try_to_resolve_by(
            candidates,
            |candidate| candidate.name().map(str::to_owned),
            case_insensitive,
        )
    }
}

impl<T: PossiblyNamed + Clone> ReferenceByName<T> {
    /// Resolve by looking the name up in `scope` and its parents.
    pub fn resolve(&mut self, scope: &Scope<T>, case_insensitive: bool) -> bool {
        self.referred = scope.lookup(&self.name, case_insensitive).cloned();
        self.is_resolved()
    }
}

impl<'a, T> From<&'a ReferenceByName<T>> for ReferenceView<'a> {
    fn from(reference: &'a ReferenceByName<T>) -> Self {
        reference.view()
    }
}

impl<T> fmt::Display for ReferenceByName<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_resolved() {
            "Solved"
        } else {
            "Unsolved"
        };
        write!(f, "Ref({})[{status}]", self.name)
    }
}

// ============================================================================
// SCOPES
// ============================================================================

/// A named entry of a [`Scope`], optionally bound to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
    pub node: Option<NodeId>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node: None,
        }
    }

    pub fn for_node(name: impl Into<String>, node: NodeId) -> Self {
        Self {
            name: name.into(),
            node: Some(node),
        }
    }
}

impl PossiblyNamed for Symbol {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// A multimap from names to symbols, with an optional parent scope.
///
/// Several symbols may share a name; lookups return the first one added.
/// Names not found locally are looked up in the parent chain, so inner
/// scopes shadow outer ones.
#[derive(Debug, Clone)]
pub struct Scope<S = Symbol> {
    symbols: IndexMap<String, Vec<S>>,
    /// Lower-cased name -> names as added
    insensitive: FxHashMap<String, Vec<String>>,
    parent: Option<Rc<Scope<S>>>,
}

impl<S> Default for Scope<S> {
    fn default() -> Self {
        Self {
            symbols: IndexMap::new(),
            insensitive: FxHashMap::default(),
            parent: None,
        }
    }
}

impl<S> Scope<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Rc<Scope<S>>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<&Rc<Scope<S>>> {
        self.parent.as_ref()
    }

    /// Register `symbol` under `name`
    pub fn add_named(&mut self, name: impl Into<String>, symbol: S) {
        let name = name.into();
        if !self.symbols.contains_key(&name) {
            self.insensitive
                .entry(name.to_lowercase())
                .or_default()
                .push(name.clone());
        }
        self.symbols.entry(name).or_default().push(symbol);
    }

    /// Local symbols, grouped by name in insertion order
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &[S])> {
        self.symbols
            .iter()
            .map(|(name, symbols)| (name.as_str(), symbols.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The first symbol named `name`, here or in a parent scope.
    pub fn lookup(&self, name: &str, case_insensitive: bool) -> Option<&S> {
        self.lookup_matching(name, case_insensitive, |_| true)
    }

    /// The first symbol named `name` satisfying `predicate`, here or in a
    /// parent scope.
    pub fn lookup_matching(
        &self,
        name: &str,
        case_insensitive: bool,
        predicate: impl Fn(&S) -> bool,
    ) -> Option<&S> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(found) = current
                .local_candidates(name, case_insensitive)
                .find(|symbol| predicate(symbol))
            {
                return Some(found);
            }
            scope = current.parent.as_deref();
        }
        None
    }

    fn local_candidates<'a>(
        &'a self,
        name: &str,
        case_insensitive: bool,
    ) -> Box<dyn Iterator<Item = &'a S> + 'a> {
        if case_insensitive {
            let names = self
                .insensitive
                .get(&name.to_lowercase())
                .map(Vec::as_slice)
                .unwrap_or_default();
            Box::new(
                names
                    .iter()
                    .filter_map(|n| self.symbols.get(n))
                    .flat_map(|symbols| symbols.iter()),
            )
        } else {
            Box::new(self.symbols.get(name).into_iter().flatten())
        }
    }
}

impl<S: PossiblyNamed> Scope<S> {
    /// Register `symbol` under its own name. Unnamed symbols are not added.
    pub fn add(&mut self, symbol: S) -> bool {
        match symbol.name().map(str::to_owned) {
            Some(name) => {
                self.add_named(name, symbol);
                true
            }
            None => false,
        }
    }
}
