//! Usage statistics for the admin settings view

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::db::{DbPool, DocumentRepository, ProfileRepository, ScanLogRepository};
use crate::models::{success_rate, UsageStats};

/// Start of the current UTC day
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

pub async fn usage_stats(db: &DbPool) -> Result<UsageStats> {
    let (total_users, premium_users, admin_users) = ProfileRepository::new(db).counts().await?;
    let total_documents = DocumentRepository::new(db).count().await?;
    let scans = ScanLogRepository::new(db)
        .counts(start_of_day(Utc::now()))
        .await?;

    Ok(UsageStats {
        total_users,
        premium_users,
        admin_users,
        total_documents,
        scans_today: scans.successes_since,
        api_calls_today: scans.attempts_since,
        success_rate: success_rate(scans.successes_total, scans.attempts_total),
    })
}
