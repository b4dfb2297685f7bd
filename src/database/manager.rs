use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Errors from the data-access layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Update has no fields to set")]
    EmptyUpdate,

    #[error("Transaction rolled back: {0}")]
    Transaction(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the shared connection pool and owns schema setup
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect using `DATABASE_URL`, optionally retargeted at `DATABASE_NAME`
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let base = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let connection_string = match std::env::var("DATABASE_NAME") {
            Ok(name) if !name.is_empty() => Self::build_connection_string(&base, &name)?,
            _ => base,
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    fn build_connection_string(base: &str, database_name: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        // Replace the path to the database name (ensure leading slash)
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    /// Apply the bundled migrations (users, lists, items and their association tables)
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

/// Roll back `tx` and surface `cause`.
///
/// A failed rollback is logged but never replaces the error that triggered it.
pub(crate) async fn abort<T>(
    tx: Transaction<'_, Postgres>,
    cause: sqlx::Error,
) -> Result<T, DatabaseError> {
    if let Err(rollback_err) = tx.rollback().await {
        error!("Rollback failed after '{}': {}", cause, rollback_err);
    }
    Err(DatabaseError::Transaction(cause))
}
