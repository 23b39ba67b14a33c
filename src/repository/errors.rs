use diesel::r2d2::PoolError;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A connection could not be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// The database rejected or failed a query.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    /// Stored data violated a domain constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
