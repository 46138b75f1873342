//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, ErrorKind};
use crate::infrastructure::traits::SourceError;

/// Application errors wrap domain and source errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// NotFound/Validation split; `None` for transport and config failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApplicationError::Domain(e) => Some(e.kind()),
            ApplicationError::Source(
                SourceError::CategoryNotFound(_) | SourceError::SubCategoryNotFound(_),
            ) => Some(ErrorKind::NotFound),
            ApplicationError::Source(SourceError::Http { status: 404, .. }) => {
                Some(ErrorKind::NotFound)
            }
            ApplicationError::Source(SourceError::Decode { .. }) => Some(ErrorKind::Validation),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
