use thiserror::Error;

use crate::domain::account::UserId;

/// Failure surfaced by the injected data-access collaborator. The engine
/// performs no I/O of its own, so retry policy lives with the collaborator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("stored record could not be decoded: {0}")]
    Decode(String),
}

/// Top-level engine failures. Only an unresolvable account aborts a report;
/// every other condition degrades into a complete-but-conservative report.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("account not found: {user_id}")]
    NotFound { user_id: UserId },
    #[error(transparent)]
    Store(#[from] StoreError),
}
