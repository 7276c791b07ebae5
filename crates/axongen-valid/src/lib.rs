//! Semantic validation rules over a loaded axongen project.
//!
//! Component A (spec.md §4.A) already validates each annotation in
//! isolation — required parameters present, types coerced, per-parameter
//! validators passed. This crate runs *cross-cutting* checks that only make
//! sense once a whole `PackageMetadata` (or a whole project of them) is
//! assembled: a route's typed path segment has a registered parser, a
//! referenced middleware is actually declared, a DI dependency graph has no
//! cycle.

pub mod report;
pub mod rules;
pub mod validator;

pub use report::{Diagnostic, ValidationReport};
pub use validator::validate_package;
