use diesel::r2d2::PoolError;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Pool(#[from] PoolError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    /// The query configuration itself is invalid, e.g. a zero page size.
    #[error("invalid query configuration: {0}")]
    Configuration(String),
    #[error("validation error: {0}")]
    Validation(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<crate::domain::types::TypeConstraintError> for RepositoryError {
    fn from(value: crate::domain::types::TypeConstraintError) -> Self {
        RepositoryError::Validation(value.to_string())
    }
}
