mod accounts;
mod inventory;
mod models;
mod seeders;

pub use models::*;

#[cfg(test)]
pub(crate) use inventory::sample_vehicle;

use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

pub type DbPool = SqlitePool;

const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

/// Failure of a single store call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("record conflicts with an existing row")]
    Conflict,
    /// A foreign key blocked the write or delete
    #[error("record is referenced by or references a missing row")]
    Referenced,
    #[error("store call exceeded {0:?}")]
    Timeout(Duration),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict,
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::Referenced
            }
            // Schemas created with ON DELETE RESTRICT report SQLITE_CONSTRAINT_TRIGGER
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER) => {
                StoreError::Referenced
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Data-access object over the relational store. Every call is bounded by
/// the configured query timeout.
#[derive(Debug, Clone)]
pub struct Store {
    pool: DbPool,
    timeout: Duration,
}

impl Store {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

/// File backing a SQLite URL, or None for in-memory databases.
fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" || path.starts_with("file::memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Open a pool and bring the schema up to date.
pub async fn connect(url: &str, max_connections: u32) -> Result<DbPool> {
    let mut options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database URL: {}", url))?
        .create_if_missing(true)
        .foreign_keys(true);

    if let Some(path) = sqlite_file_path(url) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn init(config: &DatabaseConfig) -> Result<Store> {
    info!("Initializing database at {}", config.url);
    let pool = connect(&config.url, config.max_connections).await?;
    seeders::seed_classifications(&pool).await?;
    info!("Database initialized successfully");
    Ok(Store::new(pool, config.query_timeout()))
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    // Migration 001: Accounts
    execute_sql(pool, include_str!("../../migrations/001_accounts.sql")).await?;

    // Migration 002: Classifications and inventory
    let has_inventory_table: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='inventory'",
    )
    .fetch_optional(pool)
    .await?;
    if has_inventory_table.is_none() {
        execute_sql(pool, include_str!("../../migrations/002_inventory.sql")).await?;
    }

    // Migration 003: Startup bookkeeping
    execute_sql(pool, include_str!("../../migrations/003_app_meta.sql")).await?;

    info!("Migrations completed");
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_store() -> Store {
    let pool = connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    Store::new(pool, Duration::from_secs(5))
}
