//! Provenance of nodes.

use std::fmt;
use std::rc::Rc;

use crate::base::{Position, Source};

use super::node::{AsAny, NodeId};

/// Where a node came from: a parse-tree element, another node, or just a
/// position in some code.
pub trait Origin: AsAny + fmt::Debug + 'static {
    fn position(&self) -> Option<Position>;

    fn source_text(&self) -> Option<String> {
        None
    }

    fn source(&self) -> Option<Source> {
        self.position().and_then(|position| position.source)
    }
}

impl dyn Origin {
    pub fn downcast_ref<T: Origin>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// An origin that only knows a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JustPosition(pub Position);

impl Origin for JustPosition {
    fn position(&self) -> Option<Position> {
        Some(self.0.clone())
    }
}

/// An origin spanning several other origins.
#[derive(Debug, Clone)]
pub struct CompositeOrigin {
    pub elements: Vec<Rc<dyn Origin>>,
    pub position: Option<Position>,
    pub source_text: Option<String>,
}

impl CompositeOrigin {
    pub fn new(
        elements: Vec<Rc<dyn Origin>>,
        position: Option<Position>,
        source_text: Option<String>,
    ) -> Self {
        Self {
            elements,
            position,
            source_text,
        }
    }

    /// Composite whose position covers all positioned elements.
    pub fn covering(elements: Vec<Rc<dyn Origin>>) -> Self {
        let mut position: Option<Position> = None;
        for element_position in elements.iter().filter_map(|e| e.position()) {
            position = Some(match position {
                None => element_position,
                Some(mut covered) => {
                    covered.start = covered.start.min(element_position.start);
                    covered.end = covered.end.max(element_position.end);
                    covered
                }
            });
        }
        Self::new(elements, position, None)
    }
}

impl Origin for CompositeOrigin {
    fn position(&self) -> Option<Position> {
        self.position.clone()
    }

    fn source_text(&self) -> Option<String> {
        self.source_text.clone()
    }
}

/// An origin pointing at a node of another tree.
///
/// Position and text are captured when the origin is created, so the origin
/// stays meaningful without access to the other arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOrigin {
    pub node: NodeId,
    pub position: Option<Position>,
    pub source_text: Option<String>,
}

impl Origin for NodeOrigin {
    fn position(&self) -> Option<Position> {
        self.position.clone()
    }

    fn source_text(&self) -> Option<String> {
        self.source_text.clone()
    }
}
