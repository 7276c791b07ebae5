//! Codegen-local error surface. A template or route wrapper failure is
//! wrapped into the shared `GenError` taxonomy (spec.md §7) rather than
//! introducing a second error type — `Generation` for template failures,
//! `ParserNotFound` propagated verbatim from the parser registry, and
//! `FileSystem` reserved for the caller that actually performs the write
//! (this crate only ever produces in-memory text).

use axongen_spec::error::{GenError, GenErrorKind};

/// Wraps a lower-level failure as a `Generation` error, naming the template
/// or stage that produced it (spec.md §7, "wrapped with the template name").
pub fn generation_error(stage: &str, message: impl Into<String>) -> GenError {
    GenError::new(GenErrorKind::Generation, format!("{stage}: {}", message.into()))
}
