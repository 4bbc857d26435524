//! Shared fixtures for integration tests.

pub mod entity_ast;
pub mod entity_lang;

/// A module with two entities, one of them with features.
pub const ENTITY_MODULE: &str = "module M {
    entity FOO {
        bar: BAR;
        other: foo;
    }
    entity BAR;
}";
