//! Database layer
//!
//! SQLite storage for:
//! - Identities and their profiles (subscription tier, scan quota, admin flag)
//! - Transcribed documents
//! - Transcription service API keys
//! - Scan audit logs

mod api_key_repository;
mod document_repository;
pub(crate) mod profile_repository;
mod scan_log_repository;

pub use api_key_repository::ApiKeyRepository;
pub use document_repository::DocumentRepository;
pub use profile_repository::ProfileRepository;
pub use scan_log_repository::{ScanCounts, ScanLogRepository};

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::DatabaseConfig;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and run migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Round-trip query used by the readiness probe
pub async fn check_health(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database health check failed")?;
    Ok(())
}

/// Timestamps are stored as fixed-width RFC 3339 so they sort as text
pub(crate) fn format_db_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_db_timestamp(ts: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc);
    }
    Utc::now()
}

pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<uuid::Uuid> {
    uuid::Uuid::parse_str(value).with_context(|| format!("Invalid {} id: {}", what, value))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connect_timeout_secs: 5,
    };
    init_pool(&config).await.unwrap()
}
