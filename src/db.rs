//! SQLite connection pool helpers.

use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

/// Pool of SQLite connections shared by the repositories.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// A single connection checked out of [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Build a connection pool for the database at `database_url`.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().build(manager)?;
    log::info!("Connected to SQLite database at {database_url}");
    Ok(pool)
}
