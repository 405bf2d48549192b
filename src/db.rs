use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::{ConfigError, DatabaseConfig};

/// Errors raised while opening the pool
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Creates and configures the MySQL connection pool
///
/// The pool is the only shared resource of the service. It is built once in
/// `main` and handed to the router state; requests beyond `max_connections`
/// queue until a connection frees up or `connect_timeout` elapses.
///
/// # Example
/// ```ignore
/// let pool = create_pool(&config.database).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, PoolError> {
    tracing::debug!(
        "Creating database connection pool (max_connections={})",
        config.max_connections
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(config.connect_options()?)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run the embedded schema migrations
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Convert an auto-increment id reported by MySQL into the i32 primary key type
pub fn inserted_id(result: &sqlx::mysql::MySqlQueryResult) -> Result<i32, sqlx::Error> {
    i32::try_from(result.last_insert_id())
        .map_err(|e| sqlx::Error::Protocol(format!("inserted id out of range: {}", e)))
}

/// Whether a database error is a unique-key violation
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Whether a database error is a foreign-key violation
pub fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
