mod favorite_repo;
mod user_repo;

pub use favorite_repo::{FavoriteStore, InsertOutcome, SqliteFavoriteStore};
pub use user_repo::{SqliteUserRepository, User, UserRepository};

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Database configuration
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/weatherfav.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Create and configure a SQLite connection pool
pub async fn create_pool(config: &DbConfig) -> Result<SqlitePool, DbError> {
    // File-backed databases need their directory to exist
    if let Some(db_path) = config.url.strip_prefix("sqlite:") {
        if !db_path.starts_with(':') {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        DbError::Migration(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&format!("{}?mode=rwc", config.url))
        .await?;

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    let migration_001 = include_str!("../../migrations/001_create_tables.sql");
    sqlx::raw_sql(migration_001).execute(pool).await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = create_pool(&config).await.expect("Failed to create pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
