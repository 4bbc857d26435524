//! Assertions for comparing trees in tests.
//!
//! Trees are compared structurally: concept names, attribute values,
//! reference names and containments, recursively. Node ids, parent links
//! and origins are ignored, so trees in different arenas can be compared.

use crate::model::{Ast, NodeId, PropertyKind, PropertyValue};

/// Describe the first structural difference between two subtrees, or
/// `None` if they are equal.
pub fn ast_difference(
    expected_ast: &Ast,
    expected: NodeId,
    actual_ast: &Ast,
    actual: NodeId,
    consider_position: bool,
) -> Option<String> {
    Comparison {
        expected_ast,
        actual_ast,
        consider_position,
    }
    .compare(expected, actual, "<root>")
}

/// Assert that two subtrees are structurally equal.
///
/// # Panics
///
/// Panics with the path of the first difference.
pub fn assert_asts_are_equal(
    expected_ast: &Ast,
    expected: NodeId,
    actual_ast: &Ast,
    actual: NodeId,
    consider_position: bool,
) {
    if let Some(difference) =
        ast_difference(expected_ast, expected, actual_ast, actual, consider_position)
    {
        panic!("ASTs differ: {difference}");
    }
}

struct Comparison<'a> {
    expected_ast: &'a Ast,
    actual_ast: &'a Ast,
    consider_position: bool,
}

impl Comparison<'_> {
    fn compare(&self, expected: NodeId, actual: NodeId, context: &str) -> Option<String> {
        let Some(expected_node) = self.expected_ast.get(expected) else {
            return Some(format!("{context}: expected node {expected} is missing"));
        };
        let Some(actual_node) = self.actual_ast.get(actual) else {
            return Some(format!("{context}: actual node {actual} is missing"));
        };
        let concept = expected_node.concept();
        if concept.name() != actual_node.concept().name() {
            return Some(format!(
                "{context}: expected node of type {}, but found {}",
                concept.name(),
                actual_node.concept().name()
            ));
        }
        if self.consider_position {
            let expected_position = self.expected_ast.position(expected);
            let actual_position = self.actual_ast.position(actual);
            if expected_position != actual_position {
                return Some(format!(
                    "{context}.position: expected {expected_position:?}, \
                     but found {actual_position:?}"
                ));
            }
        }

        for property in concept.properties() {
            let path = format!("{context}.{}", property.name);
            let expected_value = expected_node.property(property.name);
            let actual_value = actual_node.property(property.name);
            let difference = match property.kind {
                PropertyKind::Containment => self.compare_children(
                    expected_value,
                    actual_value,
                    &path,
                    property.is_multiple(),
                ),
                PropertyKind::Attribute | PropertyKind::Reference => {
                    compare_values(expected_value, actual_value, &path)
                }
            };
            if difference.is_some() {
                return difference;
            }
        }
        None
    }

    fn compare_children(
        &self,
        expected: Option<PropertyValue<'_>>,
        actual: Option<PropertyValue<'_>>,
        path: &str,
        indexed: bool,
    ) -> Option<String> {
        let expected = expected.and_then(|v| v.as_children()).map(|c| c.to_vec());
        let actual = actual.and_then(|v| v.as_children()).map(|c| c.to_vec());
        let (expected, actual) = (expected.unwrap_or_default(), actual.unwrap_or_default());
        if expected.len() != actual.len() {
            return Some(format!(
                "{path}: expected {} children, but found {}",
                expected.len(),
                actual.len()
            ));
        }
        expected
            .iter()
            .zip(&actual)
            .enumerate()
            .find_map(|(index, (e, a))| {
                let context = if indexed {
                    format!("{path}[{index}]")
                } else {
                    path.to_string()
                };
                self.compare(*e, *a, &context)
            })
    }
}

/// References compare by name only; resolution state is ignored.
fn compare_values(
    expected: Option<PropertyValue<'_>>,
    actual: Option<PropertyValue<'_>>,
    path: &str,
) -> Option<String> {
    let equal = match (&expected, &actual) {
        (Some(PropertyValue::Reference(e)), Some(PropertyValue::Reference(a))) => {
            e.map(|r| r.name) == a.map(|r| r.name)
        }
        (Some(PropertyValue::References(e)), Some(PropertyValue::References(a))) => {
            e.iter().map(|r| r.name).eq(a.iter().map(|r| r.name))
        }
        _ => expected == actual,
    };
    if equal {
        None
    } else {
        Some(format!("{path}: expected {expected:?}, but found {actual:?}"))
    }
}
