//! Transcription service credential models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credential for the external transcription service.
///
/// The secret never leaves the server after creation; responses carry
/// [`ApiKeySummary`] instead.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: Uuid,
    pub service_name: String,
    pub api_key: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing view of an API key with the secret masked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeySummary {
    pub id: Uuid,
    pub service_name: String,
    pub masked_key: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ApiKey> for ApiKeySummary {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id,
            service_name: key.service_name.clone(),
            masked_key: mask_secret(&key.api_key),
            is_active: key.is_active,
            created_by: key.created_by,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiKeyRequest {
    pub service_name: String,
    pub api_key: String,
    /// Defaults to active
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub is_active: bool,
}

/// Keep the first and last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
