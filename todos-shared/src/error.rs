//! Domain error types
//!
//! - [`ValidationError`]: the client sent something malformed
//! - [`TodoError::NotFound`]: a well-formed identifier matched nothing
//! - [`StoreError`]: the store failed or broke its contract

use thiserror::Error;
use uuid::Uuid;

pub use crate::query::validate::ValidationError;

/// Store-layer failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The store did something its contract rules out
    #[error("Store contract violation: {0}")]
    ContractViolation(String),
}

/// Errors returned by the todo service
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Todo {0} was not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for TodoError {
    fn from(err: sqlx::Error) -> Self {
        TodoError::Store(StoreError::Database(err))
    }
}

/// Service result type alias
pub type TodoResult<T> = Result<T, TodoError>;
