//! Walker tests over a parsed entity module.

use lasu::base::pos;
use lasu::model::{Ast, NodeId, Role, WalkOrder};
use lasu::validation::AstResult;

use crate::helpers::ENTITY_MODULE;
use crate::helpers::entity_ast::{EEntity, EFeature, EModule, entity_result};

// =============================================================================
// HELPERS
// =============================================================================

fn sample() -> (AstResult, NodeId) {
    let result = entity_result(ENTITY_MODULE);
    assert!(result.is_correct(), "unexpected issues: {:?}", result.issues);
    let root = result.root.unwrap();
    (result, root)
}

/// Names of the nodes, or their concept name for unnamed ones.
fn labels(ast: &Ast, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
    ids.into_iter()
        .map(|id| {
            if let Some(module) = ast.get_as::<EModule>(id) {
                module.name.clone()
            } else if let Some(entity) = ast.get_as::<EEntity>(id) {
                entity.name.clone()
            } else if let Some(feature) = ast.get_as::<EFeature>(id) {
                feature.name.clone()
            } else {
                ast.concept(id).map(|c| c.name().to_string()).unwrap_or_default()
            }
        })
        .collect()
}

fn find(ast: &Ast, root: NodeId, label: &str) -> NodeId {
    ast.walk(root)
        .find(|id| labels(ast, [*id]) == [label])
        .unwrap_or_else(|| panic!("no node labelled {label}"))
}

// =============================================================================
// WALKS
// =============================================================================

#[test]
fn test_walk_is_pre_order() {
    let (result, root) = sample();
    let walked: Vec<_> = result.ast.walk(root).collect();
    assert_eq!(walked[0], root);
    assert_eq!(walked.len(), 5);
    assert_eq!(
        labels(&result.ast, walked),
        vec!["M", "FOO", "bar", "other", "BAR"]
    );
}

#[test]
fn test_walk_leaves_first_ends_with_root() {
    let (result, root) = sample();
    let walked: Vec<_> = result.ast.walk_leaves_first(root).collect();
    assert_eq!(walked.last(), Some(&root));
    assert_eq!(
        labels(&result.ast, walked.iter().copied()),
        vec!["bar", "other", "FOO", "BAR", "M"]
    );

    let mut pre: Vec<_> = result.ast.walk(root).collect();
    let mut post = walked;
    pre.sort();
    post.sort();
    assert_eq!(pre, post);
}

#[test]
fn test_walk_descendants_excludes_root() {
    let (result, root) = sample();
    let depth_first: Vec<_> = result.ast.walk_descendants(root, WalkOrder::DepthFirst).collect();
    let leaves_first: Vec<_> = result.ast.walk_descendants(root, WalkOrder::LeavesFirst).collect();
    assert_eq!(depth_first.len(), 4);
    assert_eq!(leaves_first.len(), 4);
    assert!(!depth_first.contains(&root));
    assert!(!leaves_first.contains(&root));
}

#[test]
fn test_descendants_of_type() {
    let (result, root) = sample();
    let features: Vec<_> = result
        .ast
        .walk_descendants_of_type::<EFeature>(root, WalkOrder::DepthFirst)
        .map(|(_, f)| f.ty.name.clone())
        .collect();
    assert_eq!(features, vec!["BAR", "foo"]);
}

// =============================================================================
// POSITIONS
// =============================================================================

#[test]
fn test_node_positions_come_from_parse_tree() {
    let (result, root) = sample();
    let ast = &result.ast;
    assert_eq!(ast.position(root), Some(pos(1, 0, 7, 1).unwrap()));
    assert_eq!(ast.position(find(ast, root, "FOO")), Some(pos(2, 4, 5, 5).unwrap()));
    assert_eq!(ast.position(find(ast, root, "bar")), Some(pos(3, 8, 3, 17).unwrap()));
    assert_eq!(ast.source_text(find(ast, root, "BAR")).as_deref(), Some("entity BAR;"));
}

#[test]
fn test_source_text_keeps_comments_and_tabs() {
    let result = entity_result("module M {\n\tentity FOO {\t// pending\n\t\tx: FOO; }\n}");
    assert!(result.is_correct(), "unexpected issues: {:?}", result.issues);
    let root = result.root.unwrap();
    let foo = find(&result.ast, root, "FOO");
    assert_eq!(
        result.ast.source_text(foo).as_deref(),
        Some("entity FOO {\t// pending\n\t\tx: FOO; }")
    );
}

#[test]
fn test_walk_within_strict_sub_range() {
    let (result, root) = sample();
    let within: Vec<_> = result
        .ast
        .walk_within(root, &pos(3, 0, 4, 40).unwrap())
        .collect();
    assert_eq!(labels(&result.ast, within), vec!["bar", "other"]);
}

#[test]
fn test_walk_within_disjoint_range_is_empty() {
    let (result, root) = sample();
    assert_eq!(result.ast.walk_within(root, &pos(20, 0, 21, 0).unwrap()).count(), 0);
}

#[test]
fn test_walk_within_whole_range_yields_everything() {
    let (result, root) = sample();
    let whole = result.ast.position(root).unwrap();
    assert_eq!(result.ast.walk_within(root, &whole).count(), 5);
}

// =============================================================================
// ANCESTORS
// =============================================================================

#[test]
fn test_ancestors_follow_containment() {
    let (result, root) = sample();
    let ast = &result.ast;
    let foo = find(ast, root, "FOO");
    for id in ast.walk(root) {
        let ancestors: Vec<_> = ast.walk_ancestors(id).collect();
        let expected = match labels(ast, [id])[0].as_str() {
            "M" => vec![],
            "FOO" | "BAR" => vec![root],
            _ => vec![foo, root],
        };
        assert_eq!(ancestors, expected);
    }
}

#[test]
fn test_find_ancestor_by_type_and_role() {
    let (result, root) = sample();
    let ast = &result.ast;
    let bar = find(ast, root, "bar");
    let (entity_id, entity) = ast.find_ancestor_of_type::<EEntity>(bar).unwrap();
    assert_eq!(entity.name, "FOO");
    assert_eq!(ast.find_ancestor_with_role(bar, Role::EntityDeclaration), Some(entity_id));
    assert_eq!(ast.find_ancestor_with_role(bar, Role::Named), Some(root));
    assert_eq!(ast.find_ancestor_with_role(root, Role::Named), None);
}
