use pawfectly_db::DbError;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy shared by every component.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required field is missing or malformed. Not retryable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced user or match does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A concurrent write claimed the same unique key. Re-issuing the call
    /// observes the winner's row.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store is unavailable or a query failed. The detail is for logs,
    /// not for clients.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub(crate) fn from_store(op: &str, err: DbError) -> Self {
        if err.is_unique_violation() {
            CoreError::Conflict(format!("{op} conflicts with an existing record"))
        } else if err.is_foreign_key_violation() {
            CoreError::NotFound(format!("{op}: referenced user or match does not exist"))
        } else {
            error!("{} failed: {}", op, err);
            CoreError::Storage(format!("{op}: {err}"))
        }
    }
}
