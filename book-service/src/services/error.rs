use service_core::error::AppError;
use thiserror::Error;

/// Outcome of a failed storage operation.
///
/// Malformed identifiers are reported as `NotFound`, the same as ids that
/// simply have no record.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("no book exists")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(anyhow::Error),
}

impl BookError {
    /// Label used for logs and the `books_operations_total` metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            BookError::Validation(_) => "validation",
            BookError::NotFound => "not_found",
            BookError::Storage(_) => "storage",
        }
    }
}

impl From<mongodb::error::Error> for BookError {
    fn from(err: mongodb::error::Error) -> Self {
        BookError::Storage(anyhow::Error::new(err))
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Validation(e) => AppError::ValidationError(e),
            BookError::NotFound => AppError::NotFound(anyhow::anyhow!("no book exists")),
            BookError::Storage(e) => AppError::DatabaseError(e),
        }
    }
}
