//! Property catalogues for node types.
//!
//! Every node type declares its data members once, as an ordered list of
//! [`TypeExpr`]s. [`ConceptBuilder::build`] classifies each member as an
//! attribute, a containment, or a reference, together with its
//! [`Multiplicity`], and rejects declarations whose ownership is ambiguous.
//! Catalogues are built once per Rust type and cached for the lifetime of the
//! process (see [`concept_of`]).

use std::any::TypeId;
use std::fmt;
use std::sync::LazyLock;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use super::node::NodeType;

/// Names reserved for arena bookkeeping. They never appear in a catalogue.
pub const RESERVED_PROPERTY_NAMES: &[&str] = &["origin", "parent", "position", "position_override"];

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// How many values a property holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    Optional,
    Singular,
    Many,
}

impl Multiplicity {
    pub fn is_multiple(self) -> bool {
        matches!(self, Self::Many)
    }
}

/// What a property's values mean for the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A plain value
    Attribute,
    /// Owned child node(s)
    Containment,
    /// A by-name link to another node, never owned
    Reference,
}

/// Capabilities a node type can declare, independently of its concrete type.
///
/// Used by ancestor queries that look for "any statement" or "any
/// expression" rather than for one Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Expression,
    Statement,
    EntityDeclaration,
    BehaviorDeclaration,
    Parameter,
    TypeAnnotation,
    PlaceholderElement,
    Documentation,
    Named,
    Error,
}

/// One entry of a catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescription {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub multiplicity: Multiplicity,
    /// Declared element type (a concept name for containments and references)
    pub element_type: SmolStr,
}

impl PropertyDescription {
    pub fn is_attribute(&self) -> bool {
        self.kind == PropertyKind::Attribute
    }

    pub fn is_containment(&self) -> bool {
        self.kind == PropertyKind::Containment
    }

    pub fn is_reference(&self) -> bool {
        self.kind == PropertyKind::Reference
    }

    /// Containment properties provide child nodes.
    pub fn provides_nodes(&self) -> bool {
        self.is_containment()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiplicity.is_multiple()
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Declared type of a node data member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A non-node value type (string, number, enum...)
    Value(&'static str),
    /// A node type known at compile time
    Node(&'static str),
    /// A node type declared by name, resolved when the catalogue is built
    Named(&'static str),
    /// `ReferenceByName<X>`
    Reference(Box<TypeExpr>),
    Optional(Box<TypeExpr>),
    Many(Box<TypeExpr>),
    Set(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn value(type_name: &'static str) -> Self {
        Self::Value(type_name)
    }

    pub fn node<N: NodeType>() -> Self {
        Self::Node(N::NAME)
    }

    pub fn named(type_name: &'static str) -> Self {
        Self::Named(type_name)
    }

    pub fn reference(target: TypeExpr) -> Self {
        Self::Reference(Box::new(target))
    }

    pub fn optional(inner: TypeExpr) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn many(inner: TypeExpr) -> Self {
        Self::Many(Box::new(inner))
    }

    pub fn set(inner: TypeExpr) -> Self {
        Self::Set(Box::new(inner))
    }

    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        Self::Union(members.into_iter().collect())
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Value(name) | TypeExpr::Node(name) | TypeExpr::Named(name) => {
                write!(f, "{name}")
            }
            TypeExpr::Reference(inner) => write!(f, "ReferenceByName<{inner}>"),
            TypeExpr::Optional(inner) => write!(f, "Option<{inner}>"),
            TypeExpr::Many(inner) => write!(f, "Vec<{inner}>"),
            TypeExpr::Set(inner) => write!(f, "Set<{inner}>"),
            TypeExpr::Union(members) => {
                let parts: Vec<String> = members.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" | "))
            }
        }
    }
}

/// Malformed property declarations. These indicate a bug in a node type
/// declaration and are never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{concept}.{property}: union of node and non-node types is ambiguous ({declared})")]
    AmbiguousUnion {
        concept: &'static str,
        property: &'static str,
        declared: String,
    },

    #[error("{concept}.{property}: unresolved type name '{type_name}'")]
    UnresolvedType {
        concept: &'static str,
        property: &'static str,
        type_name: &'static str,
    },

    #[error("{concept}.{property}: references must target a node type ({declared})")]
    ReferenceToValue {
        concept: &'static str,
        property: &'static str,
        declared: String,
    },

    #[error("{concept}.{property}: set-valued containment is not supported")]
    SetContainment {
        concept: &'static str,
        property: &'static str,
    },

    #[error("{concept}.{property}: '{property}' is reserved for node bookkeeping")]
    ReservedName {
        concept: &'static str,
        property: &'static str,
    },

    #[error("{concept}.{property}: declared more than once")]
    DuplicateProperty {
        concept: &'static str,
        property: &'static str,
    },
}

// ============================================================================
// CONCEPT
// ============================================================================

/// The catalogue of a node type: its name, roles, and ordered properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    name: &'static str,
    /// Base concepts, nearest first
    ancestors: Vec<&'static str>,
    properties: Vec<PropertyDescription>,
    roles: Vec<Role>,
}

impl Concept {
    pub fn builder(name: &'static str) -> ConceptBuilder {
        ConceptBuilder::new(name)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ancestors(&self) -> &[&'static str] {
        &self.ancestors
    }

    /// Check if this concept is `name` or inherits from it
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.ancestors.iter().any(|a| *a == name)
    }

    pub fn properties(&self) -> &[PropertyDescription] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescription> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn containments(&self) -> impl Iterator<Item = &PropertyDescription> {
        self.properties.iter().filter(|p| p.is_containment())
    }

    pub fn references(&self) -> impl Iterator<Item = &PropertyDescription> {
        self.properties.iter().filter(|p| p.is_reference())
    }

    pub fn attributes(&self) -> impl Iterator<Item = &PropertyDescription> {
        self.properties.iter().filter(|p| p.is_attribute())
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Declares the members of a node type.
#[derive(Debug, Clone)]
pub struct ConceptBuilder {
    name: &'static str,
    base: Option<&'static Concept>,
    declared: Vec<(&'static str, TypeExpr)>,
    internal: Vec<&'static str>,
    /// Node type names [`TypeExpr::Named`] may refer to
    forward: Vec<&'static str>,
    roles: Vec<Role>,
}

impl ConceptBuilder {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            base: None,
            declared: Vec::new(),
            internal: Vec::new(),
            forward: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Inherit the properties and roles of `base`
    pub fn extends(mut self, base: &'static Concept) -> Self {
        self.base = Some(base);
        self
    }

    /// Declare a data member
    pub fn property(mut self, name: &'static str, declared: TypeExpr) -> Self {
        self.declared.push((name, declared));
        self
    }

    /// Declare a plain value member
    pub fn attribute(self, name: &'static str, type_name: &'static str) -> Self {
        self.property(name, TypeExpr::value(type_name))
    }

    /// Declare a singular containment
    pub fn child<N: NodeType>(self, name: &'static str) -> Self {
        self.property(name, TypeExpr::node::<N>())
    }

    /// Declare an optional containment
    pub fn optional_child<N: NodeType>(self, name: &'static str) -> Self {
        self.property(name, TypeExpr::optional(TypeExpr::node::<N>()))
    }

    /// Declare a list containment
    pub fn children<N: NodeType>(self, name: &'static str) -> Self {
        self.property(name, TypeExpr::many(TypeExpr::node::<N>()))
    }

    /// Declare a `ReferenceByName` member
    pub fn reference<N: NodeType>(self, name: &'static str) -> Self {
        self.property(name, TypeExpr::reference(TypeExpr::node::<N>()))
    }

    /// Exclude a member from the catalogue, including an inherited one
    pub fn internal(mut self, name: &'static str) -> Self {
        self.internal.push(name);
        self
    }

    /// Declare `name` as a node type, so members can refer to it with
    /// [`TypeExpr::named`] before its catalogue exists.
    pub fn node_type_name(mut self, name: &'static str) -> Self {
        if !self.forward.contains(&name) {
            self.forward.push(name);
        }
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Classify every declared member and produce the catalogue.
    pub fn build(self) -> Result<Concept, SchemaError> {
        let mut properties: Vec<PropertyDescription> = self
            .base
            .map(|base| base.properties.clone())
            .unwrap_or_default();
        let mut roles: Vec<Role> = self
            .base
            .map(|base| base.roles.clone())
            .unwrap_or_default();
        for role in &self.roles {
            if !roles.contains(role) {
                roles.push(*role);
            }
        }
        let ancestors: Vec<&'static str> = match self.base {
            Some(base) => std::iter::once(base.name)
                .chain(base.ancestors.iter().copied())
                .collect(),
            None => Vec::new(),
        };

        let mut seen: FxHashSet<&'static str> = FxHashSet::default();
        for (name, declared) in &self.declared {
            let name = *name;
            if RESERVED_PROPERTY_NAMES.contains(&name) {
                return Err(SchemaError::ReservedName {
                    concept: self.name,
                    property: name,
                });
            }
            if !seen.insert(name) {
                return Err(SchemaError::DuplicateProperty {
                    concept: self.name,
                    property: name,
                });
            }
            if self.internal.contains(&name) {
                continue;
            }
            let (kind, multiplicity, element_type) = self.classify(name, declared)?;
            let description = PropertyDescription {
                name,
                kind,
                multiplicity,
                element_type,
            };
            // A redeclared member overrides the inherited one in place
            match properties.iter_mut().find(|p| p.name == name) {
                Some(inherited) => *inherited = description,
                None => properties.push(description),
            }
        }
        properties.retain(|p| !self.internal.contains(&p.name));

        debug!(
            "[CONCEPT] built '{}' with {} properties",
            self.name,
            properties.len()
        );
        Ok(Concept {
            name: self.name,
            ancestors,
            properties,
            roles,
        })
    }

    fn classify(
        &self,
        property: &'static str,
        declared: &TypeExpr,
    ) -> Result<(PropertyKind, Multiplicity, SmolStr), SchemaError> {
        match *declared {
            TypeExpr::Value(name) => Ok((
                PropertyKind::Attribute,
                Multiplicity::Singular,
                SmolStr::new_static(name),
            )),
            TypeExpr::Node(name) => Ok((
                PropertyKind::Containment,
                Multiplicity::Singular,
                SmolStr::new_static(name),
            )),
            TypeExpr::Named(name) => {
                if self.is_known_node_type(name) {
                    Ok((
                        PropertyKind::Containment,
                        Multiplicity::Singular,
                        SmolStr::new_static(name),
                    ))
                } else {
                    Err(SchemaError::UnresolvedType {
                        concept: self.name,
                        property,
                        type_name: name,
                    })
                }
            }
            TypeExpr::Reference(ref target) => {
                let (kind, _, element) = self.classify(property, target)?;
                if kind != PropertyKind::Containment {
                    return Err(SchemaError::ReferenceToValue {
                        concept: self.name,
                        property,
                        declared: declared.to_string(),
                    });
                }
                Ok((PropertyKind::Reference, Multiplicity::Singular, element))
            }
            TypeExpr::Optional(ref inner) => {
                let (kind, multiplicity, element) = self.classify(property, inner)?;
                let multiplicity = match multiplicity {
                    Multiplicity::Many => Multiplicity::Many,
                    _ => Multiplicity::Optional,
                };
                Ok((kind, multiplicity, element))
            }
            TypeExpr::Many(ref inner) => {
                let (kind, _, element) = self.classify(property, inner)?;
                Ok((kind, Multiplicity::Many, element))
            }
            TypeExpr::Set(ref inner) => {
                let (kind, _, element) = self.classify(property, inner)?;
                if kind == PropertyKind::Containment {
                    return Err(SchemaError::SetContainment {
                        concept: self.name,
                        property,
                    });
                }
                Ok((kind, Multiplicity::Many, element))
            }
            TypeExpr::Union(ref members) => self.classify_union(property, declared, members),
        }
    }

    fn classify_union(
        &self,
        property: &'static str,
        declared: &TypeExpr,
        members: &[TypeExpr],
    ) -> Result<(PropertyKind, Multiplicity, SmolStr), SchemaError> {
        let ambiguous = || SchemaError::AmbiguousUnion {
            concept: self.name,
            property,
            declared: declared.to_string(),
        };
        let mut kind = None;
        let mut multiplicity = Multiplicity::Singular;
        let mut elements = Vec::with_capacity(members.len());
        for member in members {
            let (member_kind, member_multiplicity, element) = self.classify(property, member)?;
            match kind {
                None => kind = Some(member_kind),
                Some(k) if k != member_kind => return Err(ambiguous()),
                Some(_) => {}
            }
            match member_multiplicity {
                Multiplicity::Many => return Err(ambiguous()),
                Multiplicity::Optional => multiplicity = Multiplicity::Optional,
                Multiplicity::Singular => {}
            }
            elements.push(element);
        }
        let kind = kind.ok_or_else(ambiguous)?;
        let element = elements
            .iter()
            .map(SmolStr::as_str)
            .collect::<Vec<_>>()
            .join(" | ");
        Ok((kind, multiplicity, SmolStr::new(element)))
    }

    /// Forward-declared names resolve against this concept, its ancestors,
    /// node types named elsewhere in this declaration, and the names given
    /// to [`node_type_name`](Self::node_type_name). Catalogues built
    /// elsewhere are not consulted.
    fn is_known_node_type(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        if let Some(base) = self.base {
            if base.is_a(name) {
                return true;
            }
        }
        self.forward.iter().any(|n| *n == name)
            || self
                .declared
                .iter()
                .any(|(_, declared)| mentions_node_type(declared, name))
    }
}

fn mentions_node_type(declared: &TypeExpr, name: &str) -> bool {
    match declared {
        TypeExpr::Node(n) => *n == name,
        TypeExpr::Value(_) | TypeExpr::Named(_) => false,
        TypeExpr::Reference(inner)
        | TypeExpr::Optional(inner)
        | TypeExpr::Many(inner)
        | TypeExpr::Set(inner) => mentions_node_type(inner, name),
        TypeExpr::Union(members) => members.iter().any(|m| mentions_node_type(m, name)),
    }
}

// ============================================================================
// PER-TYPE CACHE
// ============================================================================

static CONCEPTS: LazyLock<RwLock<FxHashMap<TypeId, &'static Concept>>> =
    LazyLock::new(Default::default);

/// Build (once) and return the catalogue of `N`.
pub fn try_concept_of<N: NodeType>() -> Result<&'static Concept, SchemaError> {
    let key = TypeId::of::<N>();
    if let Some(concept) = CONCEPTS.read().get(&key).copied() {
        return Ok(concept);
    }
    // Built outside the lock: describe() may ask for base catalogues
    let built = N::describe().build()?;
    let concept = *CONCEPTS
        .write()
        .entry(key)
        .or_insert_with(|| &*Box::leak(Box::new(built)));
    Ok(concept)
}

/// The catalogue of `N`.
///
/// # Panics
///
/// Panics if the declaration of `N` is malformed (see [`SchemaError`]).
pub fn concept_of<N: NodeType>() -> &'static Concept {
    match try_concept_of::<N>() {
        Ok(concept) => concept,
        Err(error) => panic!("invalid node type declaration: {error}"),
    }
}
