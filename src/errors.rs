use sea_orm::error::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Service-level errors surfaced by the forecasting engine.
///
/// Only validation failures and a missing sales history reject a request
/// outright; degenerate computations fall back silently and persistence
/// failures are logged, never surfaced.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Helper for mapping database errors in closures
    pub fn db_error(err: DbErr) -> Self {
        ServiceError::DatabaseError(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::ValidationError(errors.to_string())
    }
}
