//! Scopes and by-name references.

use std::rc::Rc;

use lasu::model::{ReferenceByName, Scope, Symbol};

use crate::helpers::ENTITY_MODULE;
use crate::helpers::entity_ast::{EEntity, EFeature, entity_result, resolve_types};

#[test]
fn test_local_symbol_shadows_parent() {
    let mut outer = Scope::new();
    outer.add(Symbol::new("a"));
    outer.add(Symbol::new("b"));
    let outer = Rc::new(outer);

    let mut inner = Scope::with_parent(outer.clone());
    inner.add_named("a", Symbol::new("local a"));

    assert_eq!(inner.lookup("a", false).unwrap().name, "local a");
    assert_eq!(inner.lookup("b", false).unwrap().name, "b");
    assert!(inner.lookup("c", false).is_none());
    assert_eq!(outer.lookup("a", false).unwrap().name, "a");
}

#[test]
fn test_case_insensitive_lookup_sees_later_additions() {
    let mut scope = Scope::new();
    scope.add(Symbol::new("Alpha"));
    assert!(scope.lookup("BETA", true).is_none());

    scope.add(Symbol::new("Beta"));
    assert_eq!(scope.lookup("BETA", true).unwrap().name, "Beta");
    assert_eq!(scope.lookup("alpha", true).unwrap().name, "Alpha");
    assert!(scope.lookup("alpha", false).is_none());
}

#[test]
fn test_case_insensitive_lookup_reaches_parent() {
    let mut outer = Scope::new();
    outer.add(Symbol::new("Gamma"));
    let inner: Scope = Scope::with_parent(Rc::new(outer));
    assert_eq!(inner.lookup("gamma", true).unwrap().name, "Gamma");
}

#[test]
fn test_reference_resolves_through_scope() {
    let mut scope = Scope::new();
    scope.add(Symbol::new("Target"));

    let mut reference: ReferenceByName<Symbol> = ReferenceByName::new("Target");
    assert!(!reference.is_resolved());
    assert!(reference.resolve(&scope, false));
    assert_eq!(reference.to_string(), "Ref(Target)[Solved]");

    let mut missing: ReferenceByName<Symbol> = ReferenceByName::new("target");
    assert!(!missing.resolve(&scope, false));
    assert_eq!(missing.to_string(), "Ref(target)[Unsolved]");
    assert!(missing.resolve(&scope, true));
}

#[test]
fn test_feature_types_resolve_to_entities() {
    let mut result = entity_result(ENTITY_MODULE);
    let root = result.root.unwrap();

    assert_eq!(resolve_types(&mut result.ast, root, false), 1);
    assert_eq!(resolve_types(&mut result.ast, root, true), 0);

    let (bar_id, _) = result
        .ast
        .search_by_type::<EEntity>(root)
        .find(|(_, e)| e.name == "BAR")
        .unwrap();
    let targets: Vec<_> = result
        .ast
        .search_by_type::<EFeature>(root)
        .map(|(_, f)| (f.ty.name.clone(), f.ty.referred.as_ref().and_then(|s| s.node)))
        .collect();
    assert_eq!(targets[0], ("BAR".to_string(), Some(bar_id)));
    assert_eq!(targets[1].0, "foo");
    assert!(targets[1].1.is_some());
}
