//! Property values as seen by generic code.

use std::fmt;

use super::error::TreeError;
use super::node::NodeId;

/// The value of an attribute property.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    List(Vec<Attribute<'a>>),
}

impl fmt::Display for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Null => write!(f, "null"),
            Attribute::Bool(b) => write!(f, "{b}"),
            Attribute::Int(i) => write!(f, "{i}"),
            Attribute::Float(x) => write!(f, "{x}"),
            Attribute::Str(s) => write!(f, "{s:?}"),
            Attribute::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl<'a> From<&'a str> for Attribute<'a> {
    fn from(value: &'a str) -> Self {
        Attribute::Str(value)
    }
}

impl<'a> From<&'a String> for Attribute<'a> {
    fn from(value: &'a String) -> Self {
        Attribute::Str(value.as_str())
    }
}

impl From<bool> for Attribute<'_> {
    fn from(value: bool) -> Self {
        Attribute::Bool(value)
    }
}

impl From<i64> for Attribute<'_> {
    fn from(value: i64) -> Self {
        Attribute::Int(value)
    }
}

impl From<i32> for Attribute<'_> {
    fn from(value: i32) -> Self {
        Attribute::Int(i64::from(value))
    }
}

impl From<u32> for Attribute<'_> {
    fn from(value: u32) -> Self {
        Attribute::Int(i64::from(value))
    }
}

impl From<f64> for Attribute<'_> {
    fn from(value: f64) -> Self {
        Attribute::Float(value)
    }
}

impl<'a, T: Into<Attribute<'a>>> From<Option<T>> for Attribute<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Attribute::Null, Into::into)
    }
}

/// Read-only view of a containment property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Children<'a> {
    One(NodeId),
    Maybe(Option<NodeId>),
    Many(&'a [NodeId]),
}

impl<'a> Children<'a> {
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + 'a {
        let (single, many): (Option<NodeId>, &'a [NodeId]) = match *self {
            Children::One(id) => (Some(id), &[]),
            Children::Maybe(id) => (id, &[]),
            Children::Many(ids) => (None, ids),
        };
        single.into_iter().chain(many.iter().copied())
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        match self {
            Children::One(_) => 1,
            Children::Maybe(id) => usize::from(id.is_some()),
            Children::Many(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only view of a `ReferenceByName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceView<'a> {
    pub name: &'a str,
    pub resolved: bool,
}

/// The value of a catalogue property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue<'a> {
    Attribute(Attribute<'a>),
    Containment(Children<'a>),
    Reference(Option<ReferenceView<'a>>),
    References(Vec<ReferenceView<'a>>),
}

impl<'a> PropertyValue<'a> {
    pub fn attribute(value: impl Into<Attribute<'a>>) -> Self {
        PropertyValue::Attribute(value.into())
    }

    pub fn child(id: NodeId) -> Self {
        PropertyValue::Containment(Children::One(id))
    }

    pub fn optional_child(id: Option<NodeId>) -> Self {
        PropertyValue::Containment(Children::Maybe(id))
    }

    pub fn children(ids: &'a [NodeId]) -> Self {
        PropertyValue::Containment(Children::Many(ids))
    }

    pub fn as_children(&self) -> Option<Children<'a>> {
        match self {
            PropertyValue::Containment(children) => Some(*children),
            _ => None,
        }
    }
}

/// Writable access to a containment property.
#[derive(Debug)]
pub enum ChildSlot<'a> {
    One(&'a mut NodeId),
    Maybe(&'a mut Option<NodeId>),
    Many(&'a mut Vec<NodeId>),
}

/// A new value for a containment property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildValue {
    Single(Option<NodeId>),
    Many(Vec<NodeId>),
}

impl ChildSlot<'_> {
    /// Overwrite the slot with `value`.
    pub fn assign(self, value: ChildValue) -> Result<(), TreeError> {
        match (self, value) {
            (ChildSlot::One(slot), ChildValue::Single(Some(id))) => *slot = id,
            (ChildSlot::One(_), ChildValue::Single(None)) => {
                return Err(TreeError::MissingRequiredChild);
            }
            (ChildSlot::Maybe(slot), ChildValue::Single(id)) => *slot = id,
            (ChildSlot::Many(slot), ChildValue::Single(id)) => *slot = id.into_iter().collect(),
            (ChildSlot::Many(slot), ChildValue::Many(ids)) => *slot = ids,
            (ChildSlot::One(_) | ChildSlot::Maybe(_), ChildValue::Many(ids)) => {
                return Err(TreeError::TooManyChildren(ids.len()));
            }
        }
        Ok(())
    }

    /// Replace every id in the slot with `f(id)`, in place.
    pub fn map(self, mut f: impl FnMut(NodeId) -> NodeId) {
        match self {
            ChildSlot::One(slot) => *slot = f(*slot),
            ChildSlot::Maybe(slot) => *slot = slot.map(&mut f),
            ChildSlot::Many(slot) => {
                for id in slot.iter_mut() {
                    *id = f(*id);
                }
            }
        }
    }
}
