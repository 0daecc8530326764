use thiserror::Error;

use crate::validation::ValidationError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure signals at the store boundary
#[derive(Debug, Error)]
pub enum StoreError {
    /// The row does not exist or belongs to someone else. The two are never told apart.
    #[error("resource not found")]
    NotFound,

    /// The acting user id has no account row, e.g. a token that outlived its user
    #[error("unknown owner")]
    UnknownOwner,

    #[error("rejected: {0}")]
    Rejected(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl StoreError {
    /// Persistence-layer failure, as opposed to a caller mistake
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Database(_) | StoreError::Pool(_))
    }
}
