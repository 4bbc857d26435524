//! Identity transformation of entity ASTs.

use std::rc::Rc;

use lasu::model::{GenericNode, NodeOrigin};
use lasu::testing::assert_asts_are_equal;
use lasu::transformation::{AstSource, AstTransformer};

use crate::helpers::ENTITY_MODULE;
use crate::helpers::entity_ast::{EEntity, EFeature, EModule, entity_result, resolve_types};

fn identity_transformer() -> AstTransformer<AstSource> {
    let mut transformer = AstTransformer::new();
    transformer.register_identity_transformation::<EModule>();
    transformer.register_identity_transformation::<EEntity>();
    transformer.register_identity_transformation::<EFeature>();
    transformer
}

#[test]
fn test_identity_copy_is_equal() {
    let mut result = entity_result(ENTITY_MODULE);
    let root = result.root.unwrap();
    resolve_types(&mut result.ast, root, true);
    let source = Rc::new(result.ast);

    let mut transformer = identity_transformer();
    let copy = transformer
        .transform_to_result(&AstSource::new(source.clone(), root))
        .unwrap();
    let copy_root = copy.root.unwrap();

    assert!(copy.issues.is_empty());
    assert_asts_are_equal(&source, root, &copy.ast, copy_root, true);
    assert_eq!(copy.ast.walk(copy_root).count(), source.walk(root).count());
}

#[test]
fn test_identity_copy_points_back_at_source_nodes() {
    let result = entity_result(ENTITY_MODULE);
    let root = result.root.unwrap();
    let source = Rc::new(result.ast);

    let mut transformer = identity_transformer();
    let copy = transformer
        .transform_to_result(&AstSource::new(source.clone(), root))
        .unwrap();

    for (original, copied) in source.walk(root).zip(copy.ast.walk(copy.root.unwrap())) {
        let origin = copy.ast.origin(copied).unwrap();
        let origin = origin.downcast_ref::<NodeOrigin>().unwrap();
        assert_eq!(origin.node, original);
        assert_eq!(origin.source_text, source.source_text(original));
    }
}

#[test]
fn test_resolved_references_are_copied() {
    let mut result = entity_result(ENTITY_MODULE);
    let root = result.root.unwrap();
    resolve_types(&mut result.ast, root, false);
    let source = Rc::new(result.ast);

    let mut transformer = identity_transformer();
    let copy = transformer
        .transform_to_result(&AstSource::new(source, root))
        .unwrap();
    let resolved: Vec<_> = copy
        .ast
        .search_by_type::<EFeature>(copy.root.unwrap())
        .map(|(_, f)| f.ty.is_resolved())
        .collect();
    assert_eq!(resolved, vec![true, false]);
}

#[test]
fn test_unregistered_types_become_generic_nodes() {
    let result = entity_result(ENTITY_MODULE);
    let root = result.root.unwrap();
    let source = Rc::new(result.ast);

    let mut transformer = AstTransformer::new();
    transformer.register_identity_transformation::<EModule>();
    transformer.register_identity_transformation::<EEntity>();
    let copy = transformer
        .transform_to_result(&AstSource::new(source, root))
        .unwrap();

    let generic = copy
        .ast
        .search_by_type::<GenericNode>(copy.root.unwrap())
        .count();
    assert_eq!(generic, 2);
    assert_eq!(copy.issues.len(), 2);
    assert!(copy.issues.iter().all(|i| i.message == "Source node not mapped: EFeature"));
}
