//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid snapshot data.
///
/// Engine operations never fail: unknown ids are a no-op. These errors only
/// come from importing seeds that break the snapshot invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("invalid seed: {message}")]
    InvalidSeed { message: String },
}
