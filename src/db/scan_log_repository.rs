//! Scan audit log repository and usage statistics

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_db_timestamp, parse_db_timestamp, parse_uuid};
use crate::models::{NewScanLog, ScanLog};

#[derive(Debug, sqlx::FromRow)]
struct ScanLogRow {
    id: String,
    user_id: String,
    document_id: Option<String>,
    success: bool,
    error_message: Option<String>,
    processing_time: Option<i64>,
    created_at: String,
}

/// Raw scan counters behind the usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScanCounts {
    pub successes_since: i64,
    pub attempts_since: i64,
    pub successes_total: i64,
    pub attempts_total: i64,
}

pub struct ScanLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ScanLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, log: &NewScanLog) -> Result<ScanLog> {
        let entry = ScanLog {
            id: Uuid::new_v4(),
            user_id: log.user_id,
            document_id: log.document_id,
            success: log.success,
            error_message: log.error_message.clone(),
            processing_time: log.processing_time,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO scan_logs (id, user_id, document_id, success, error_message, processing_time, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(entry.document_id.map(|d| d.to_string()))
        .bind(entry.success)
        .bind(&entry.error_message)
        .bind(entry.processing_time)
        .bind(format_db_timestamp(entry.created_at))
        .execute(self.pool)
        .await
        .context("Failed to record scan log")?;

        Ok(entry)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ScanLog>> {
        let rows = sqlx::query_as::<_, ScanLogRow>(
            r#"
            SELECT id, user_id, document_id, success, error_message, processing_time, created_at
            FROM scan_logs
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list scan logs")?;

        rows.into_iter().map(row_to_scan_log).collect()
    }

    /// Success and attempt counts since `since` and over all time
    pub async fn counts(&self, since: DateTime<Utc>) -> Result<ScanCounts> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN success = 1 AND created_at >= ?1 THEN 1 ELSE 0 END), 0) AS successes_since,
                COALESCE(SUM(CASE WHEN created_at >= ?1 THEN 1 ELSE 0 END), 0) AS attempts_since,
                COALESCE(SUM(CASE WHEN success = 1 THEN 1 ELSE 0 END), 0) AS successes_total,
                COUNT(*) AS attempts_total
            FROM scan_logs
            "#,
        )
        .bind(format_db_timestamp(since))
        .fetch_one(self.pool)
        .await
        .context("Failed to count scan logs")?;

        Ok(ScanCounts {
            successes_since: row.try_get("successes_since")?,
            attempts_since: row.try_get("attempts_since")?,
            successes_total: row.try_get("successes_total")?,
            attempts_total: row.try_get("attempts_total")?,
        })
    }
}

fn row_to_scan_log(row: ScanLogRow) -> Result<ScanLog> {
    Ok(ScanLog {
        id: parse_uuid(&row.id, "scan log")?,
        user_id: parse_uuid(&row.user_id, "user")?,
        document_id: row
            .document_id
            .as_deref()
            .map(|s| parse_uuid(s, "document"))
            .transpose()?,
        success: row.success,
        error_message: row.error_message,
        processing_time: row.processing_time,
        created_at: parse_db_timestamp(&row.created_at),
    })
}
