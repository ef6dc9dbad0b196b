pub mod repository;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

pub use repository::{SqliteCourseRepository, SqliteTaskRepository};

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("schema setup failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

// Foreign keys stay off: deleting a course must leave its tasks in place.
fn base_options(url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
    Ok(SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(false))
}

/// Opens the pool described by `config` and creates the tables if needed.
pub async fn connect(config: &AppConfig) -> Result<SqlitePool, DbInitError> {
    let options = base_options(&config.database_url)?;

    if let Some(dir) = options.get_filename().parent() {
        if !dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(dir).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    info!("database ready at {}", config.database_url);
    Ok(pool)
}

/// A private in-memory database on a single long-lived connection.
pub async fn connect_in_memory() -> Result<SqlitePool, DbInitError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(base_options("sqlite::memory:")?)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), DbInitError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
