//! Scan orchestrator: upload check, quota, credential lookup, transcription
//! and persistence of the resulting document.

use std::time::Instant;

use anyhow::Context;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{ApiKeyRepository, DbPool, DocumentRepository, ProfileRepository, ScanLogRepository};
use crate::models::{Document, NewDocument, NewScanLog, Profile};
use crate::services::ocr::{readable_text, ImageData, TranscriptionError, TranscriptionProvider};
use crate::utils::AppError;

/// Title used when the upload carries no file name
pub const UNTITLED_SCAN: &str = "Untitled scan";

/// Uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Declared type is `image/*` and the payload is non-empty
    pub fn is_image(&self) -> bool {
        !self.bytes.is_empty()
            && self
                .content_type
                .as_deref()
                .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
                .unwrap_or(false)
    }

    fn title(&self) -> String {
        self.file_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNTITLED_SCAN)
            .to_string()
    }
}

/// Scan failure; `Display` is the message shown to the user
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Please select a valid image file")]
    InvalidImage,

    #[error("Scan limit reached. Upgrade to Premium for unlimited scans.")]
    QuotaExceeded,

    #[error("Service temporarily unavailable. Please contact support.")]
    ServiceUnavailable,

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error("Scan failed: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        let message = err.to_string();
        match err {
            ScanError::InvalidImage => AppError::BadRequest(message),
            ScanError::QuotaExceeded => AppError::Forbidden(message),
            ScanError::ServiceUnavailable => AppError::ServiceUnavailable(message),
            ScanError::Transcription(
                TranscriptionError::NoContent | TranscriptionError::NoReadableText,
            ) => AppError::ValidationError(message),
            ScanError::Transcription(_) => AppError::Upstream(message),
            ScanError::Internal(_) => AppError::Internal(message),
        }
    }
}

/// Successful scan: the stored document and the profile after the increment
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub document: Document,
    pub profile: Profile,
    pub processing_time_ms: i64,
}

pub struct ScanOrchestrator<'a> {
    db: &'a DbPool,
    provider: &'a dyn TranscriptionProvider,
    service_name: &'a str,
}

impl<'a> ScanOrchestrator<'a> {
    pub fn new(
        db: &'a DbPool,
        provider: &'a dyn TranscriptionProvider,
        service_name: &'a str,
    ) -> Self {
        Self {
            db,
            provider,
            service_name,
        }
    }

    /// Transcribe one upload for `user_id`.
    ///
    /// Input, quota and credential rejections leave no trace. Transcription
    /// failures are logged to `scan_logs` and change nothing else. On success
    /// the document is created before the counter is incremented; the two
    /// writes are independent.
    pub async fn scan(&self, user_id: Uuid, upload: ImageUpload) -> Result<ScanOutcome, ScanError> {
        if !upload.is_image() {
            return Err(ScanError::InvalidImage);
        }

        let profiles = ProfileRepository::new(self.db);
        if !profiles.can_user_scan(user_id).await? {
            info!(user_id = %user_id, "Scan rejected, quota exhausted");
            return Err(ScanError::QuotaExceeded);
        }

        let key = ApiKeyRepository::new(self.db)
            .find_active(self.service_name)
            .await?
            .ok_or_else(|| {
                warn!(service = %self.service_name, "No active API key configured");
                ScanError::ServiceUnavailable
            })?;

        let title = upload.title();
        let image = ImageData {
            mime_type: upload
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes: upload.bytes,
        };

        let started = Instant::now();
        let transcript = self.provider.transcribe(&key.api_key, &image).await;
        let processing_time_ms = started.elapsed().as_millis() as i64;

        let text = match transcript.and_then(|raw| readable_text(&raw)) {
            Ok(text) => text,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Transcription failed");
                self.record(NewScanLog {
                    user_id,
                    document_id: None,
                    success: false,
                    error_message: Some(err.to_string()),
                    processing_time: Some(processing_time_ms),
                })
                .await;
                return Err(err.into());
            }
        };

        let document = DocumentRepository::new(self.db)
            .create(&NewDocument {
                user_id,
                title,
                original_text: text,
                image_url: None,
            })
            .await?;

        let profile = profiles
            .increment_scan_count(user_id)
            .await?
            .context("Profile missing after scan")?;

        self.record(NewScanLog {
            user_id,
            document_id: Some(document.id),
            success: true,
            error_message: None,
            processing_time: Some(processing_time_ms),
        })
        .await;

        info!(
            user_id = %user_id,
            document_id = %document.id,
            scans_used = profile.scans_used,
            processing_time_ms,
            "Scan completed"
        );

        Ok(ScanOutcome {
            document,
            profile,
            processing_time_ms,
        })
    }

    /// Audit only; a failed write does not fail the scan
    async fn record(&self, log: NewScanLog) {
        if let Err(e) = ScanLogRepository::new(self.db).insert(&log).await {
            warn!(user_id = %log.user_id, error = %e, "Failed to record scan log");
        }
    }
}
