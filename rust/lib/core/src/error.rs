use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Front ends match on these,
// never on the human-readable message string.

pub mod error_code {
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Typed failure returned by the store layer.
///
/// Expected failures such as duplicate keys come back as values; nothing in
/// the store panics on them. Operator input is checked before it gets here.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Duplicate key on insert.
    #[error("{0}")]
    Conflict(String),

    /// Storage backend failure (I/O, locked or corrupt file, bad SQL).
    #[error("{0}")]
    Storage(String),

    /// Stored data did not have the expected shape.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }
}
