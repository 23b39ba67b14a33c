use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
    /// Submitted form data was rejected.
    #[error("form error: {0}")]
    Form(String),
    /// A value violated a domain constraint.
    #[error("type constraint violation: {0}")]
    TypeConstraint(String),
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
