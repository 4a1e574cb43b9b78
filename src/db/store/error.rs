//! Errors surfaced by store operations.

use crate::sid::KeyGenError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key was never created or has already been evicted.
    #[error("session {0} does not exist")]
    NotFound(String),

    /// The key generator could not produce a token.
    #[error("session id generation failed")]
    KeyGenerationFailed(#[from] KeyGenError),
}

impl StoreError {
    /// Reports whether the error is a `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
