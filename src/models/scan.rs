//! Scan audit records, scan results and usage statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Document, Profile};

/// Audit record of one transcription attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Option<Uuid>,
    pub success: bool,
    pub error_message: Option<String>,
    /// Milliseconds spent in the transcription call
    pub processing_time: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewScanLog {
    pub user_id: Uuid,
    pub document_id: Option<Uuid>,
    pub success: bool,
    pub error_message: Option<String>,
    pub processing_time: Option<i64>,
}

/// Result of a successful scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanResponse {
    pub text: String,
    pub document: Document,
    pub scans_used: i64,
    pub usage: String,
}

impl ScanResponse {
    pub fn new(document: Document, profile: &Profile) -> Self {
        Self {
            text: document.original_text.clone(),
            scans_used: profile.scans_used,
            usage: profile.usage_label(),
            document,
        }
    }
}

/// Aggregate usage figures for the admin settings view
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageStats {
    pub total_users: i64,
    pub premium_users: i64,
    pub admin_users: i64,
    pub total_documents: i64,
    /// Successful scans since midnight UTC
    pub scans_today: i64,
    /// All transcription calls since midnight UTC
    pub api_calls_today: i64,
    /// Percentage of successful transcription calls, all time
    pub success_rate: Option<f64>,
}

/// Success percentage rounded to one decimal; `None` without attempts
pub fn success_rate(successes: i64, attempts: i64) -> Option<f64> {
    if attempts <= 0 {
        return None;
    }
    let rate = successes as f64 * 100.0 / attempts as f64;
    Some((rate * 10.0).round() / 10.0)
}
