//! Converting entity-language parse trees.

use lasu::base::pos;
use lasu::model::Ast;
use lasu::parse_tree::ParseTreeOrigin;
use lasu::testing::{assert_asts_are_equal, ast_difference};
use lasu::validation::{IssueSeverity, IssueType};

use crate::helpers::ENTITY_MODULE;
use crate::helpers::entity_ast::{EEntity, EModule, entity_names, entity_result};

fn expected_module(name: &str, entities: &[&str]) -> (Ast, lasu::model::NodeId) {
    let mut ast = Ast::new();
    let entities = entities
        .iter()
        .map(|name| ast.insert(EEntity::named(name)))
        .collect();
    let root = ast.insert(EModule {
        name: name.to_string(),
        entities,
    });
    ast.assign_parents(root);
    (ast, root)
}

// =============================================================================
// CONVERSION
// =============================================================================

#[test]
fn test_module_with_two_entities() {
    let result = entity_result("module M { entity FOO; entity BAR; }");
    assert!(result.is_correct());
    assert!(result.issues.is_empty());

    let (expected, expected_root) = expected_module("M", &["FOO", "BAR"]);
    assert_asts_are_equal(&expected, expected_root, &result.ast, result.root.unwrap(), false);
}

#[test]
fn test_difference_is_reported_with_path() {
    let result = entity_result("module M { entity FOO; entity BAZ; }");
    let (expected, expected_root) = expected_module("M", &["FOO", "BAR"]);
    let root = result.root.unwrap();
    let difference = ast_difference(&expected, expected_root, &result.ast, root, false).unwrap();
    assert!(difference.starts_with("<root>.entities[1].name"), "{difference}");
}

#[test]
fn test_children_get_parents_and_origins() {
    let result = entity_result(ENTITY_MODULE);
    let root = result.root.unwrap();
    let ast = &result.ast;
    for id in ast.walk(root).skip(1) {
        assert!(ast.parent(id).is_some());
        let origin = ast.origin(id).unwrap();
        assert!(origin.downcast_ref::<ParseTreeOrigin>().is_some());
    }
    assert_eq!(entity_names(ast, root), vec!["FOO", "BAR"]);
}

// =============================================================================
// ISSUES
// =============================================================================

#[test]
fn test_syntax_error_keeps_the_tree() {
    let result = entity_result("module M { entity FOO entity BAR; }");
    let root = result.root.unwrap();
    assert_eq!(entity_names(&result.ast, root), vec!["FOO", "BAR"]);

    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    assert_eq!(issue.kind, IssueType::Syntactic);
    assert_eq!(issue.severity, IssueSeverity::Error);
    assert_eq!(issue.message, "missing SEMI at 'entity'");
    assert_eq!(issue.position, Some(pos(1, 11, 1, 21).unwrap()));
    assert!(!result.is_correct());
}

#[test]
fn test_lexical_issues_come_first() {
    let result = entity_result("module M { entity F$O; }");
    let kinds: Vec<_> = result.issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![IssueType::Lexical, IssueType::Syntactic, IssueType::Syntactic]
    );
    assert_eq!(result.issues[0].message, "token recognition error at: '$'");
    assert_eq!(result.issues[0].position, Some(pos(1, 19, 1, 20).unwrap()));
}
