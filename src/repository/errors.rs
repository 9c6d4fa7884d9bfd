use thiserror::Error;

use crate::domain::types::TypeConstraintError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(err.to_string())
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Unexpected(format!("Failed to decode backend response: {err}"))
        } else {
            RepositoryError::ConnectionError(format!("Backend request failed: {err}"))
        }
    }
}

/// Maps a PostgREST error code to a repository error.
pub fn from_backend_code(code: &str, message: String) -> RepositoryError {
    match code {
        "23505" => RepositoryError::ConstraintViolation(format!(
            "Unique constraint violation: {message}"
        )),
        "23503" => RepositoryError::ConstraintViolation(format!(
            "Foreign key constraint violation: {message}"
        )),
        "23502" => RepositoryError::ConstraintViolation(format!(
            "Not null constraint violation: {message}"
        )),
        "23514" => RepositoryError::ConstraintViolation(format!(
            "Check constraint violation: {message}"
        )),
        "PGRST116" => RepositoryError::NotFound,
        _ => RepositoryError::BackendError(message),
    }
}
