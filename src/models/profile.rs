//! User profile model: subscription tier, scan quota and admin flag

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default scan allowance for a free account
pub const DEFAULT_FREE_MAX_SCANS: i64 = 1;

/// Premium allowance; profiles at or above this limit are shown as unlimited
pub const UNLIMITED_MAX_SCANS: i64 = 1000;

/// Subscription tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    #[default]
    Free,
    Premium,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Free => "free",
            SubscriptionType::Premium => "premium",
        }
    }
}

impl std::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(SubscriptionType::Free),
            "premium" => Ok(SubscriptionType::Premium),
            _ => Err(format!("Invalid subscription type: {}", s)),
        }
    }
}

/// Per-user profile record, 1:1 with an identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub subscription_type: SubscriptionType,
    pub scans_used: i64,
    pub max_scans: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new free-tier profile for a freshly registered identity
    pub fn new(id: Uuid, email: String, full_name: Option<String>, max_scans: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            full_name,
            subscription_type: SubscriptionType::Free,
            scans_used: 0,
            max_scans,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Locally synthesized profile used when the stored record cannot be read.
    ///
    /// Always free-tier and never admin, so a failed fetch can not widen access.
    pub fn fallback(id: Uuid, email: impl Into<String>, max_scans: i64) -> Self {
        Self::new(id, email.into(), None, max_scans)
    }

    pub fn is_premium(&self) -> bool {
        self.subscription_type == SubscriptionType::Premium
    }

    /// Quota pre-check performed before any transcription call
    pub fn can_scan(&self) -> bool {
        self.is_admin || self.is_premium() || self.scans_used < self.max_scans
    }

    /// Free, non-admin profile that has used its whole allowance
    pub fn is_at_limit(&self) -> bool {
        !self.can_scan()
    }

    pub fn has_unlimited_scans(&self) -> bool {
        self.is_admin || self.max_scans >= UNLIMITED_MAX_SCANS
    }

    /// Usage label shown next to the scanner, e.g. `0/1` or `12/∞`
    pub fn usage_label(&self) -> String {
        if self.has_unlimited_scans() {
            format!("{}/∞", self.scans_used)
        } else {
            format!("{}/{}", self.scans_used, self.max_scans)
        }
    }

    /// Scans left before the limit; `None` when unlimited
    pub fn remaining_scans(&self) -> Option<i64> {
        if self.is_admin || self.is_premium() {
            None
        } else {
            Some((self.max_scans - self.scans_used).max(0))
        }
    }
}

/// Self-service profile update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
}

/// Admin update of tier, limits and role
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdateProfileRequest {
    pub subscription_type: Option<SubscriptionType>,
    pub max_scans: Option<i64>,
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub reset_scans: bool,
}

/// Fully resolved field set written by [`crate::db::ProfileRepository::update`]
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub subscription_type: SubscriptionType,
    pub scans_used: i64,
    pub max_scans: i64,
    pub is_admin: bool,
}

impl From<&Profile> for ProfileChanges {
    fn from(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            subscription_type: profile.subscription_type,
            scans_used: profile.scans_used,
            max_scans: profile.max_scans,
            is_admin: profile.is_admin,
        }
    }
}
