//! Node model tests
//!
//! Tests over ASTs built from the entity language:
//! - Walkers and position-scoped walks
//! - Parent links and structural replacement
//! - Scopes and reference resolution

pub mod tests_scopes;
pub mod tests_walking;
