use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found, or is not visible to this actor.
    #[error("not found")]
    NotFound,
    /// Submitted form data failed validation; redisplay with this message.
    #[error("{0}")]
    Form(String),
    /// The request's own parameters are malformed, e.g. a zero page size.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Configuration(message) => ServiceError::Configuration(message),
            RepositoryError::Validation(message) => ServiceError::Form(message),
            RepositoryError::Pool(_) | RepositoryError::Database(_) => ServiceError::Internal,
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(value: TypeConstraintError) -> Self {
        ServiceError::Form(value.to_string())
    }
}

/// Log unexpected repository failures before mapping them; configuration and
/// validation errors pass through untouched.
pub(crate) fn log_repo_error(context: &str, err: RepositoryError) -> ServiceError {
    if matches!(
        err,
        RepositoryError::Pool(_) | RepositoryError::Database(_)
    ) {
        log::error!("{context}: {err}");
    }
    ServiceError::from(err)
}
