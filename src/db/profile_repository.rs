//! Profile repository: tier, quota counter and admin flag per identity

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_db_timestamp, parse_db_timestamp, parse_uuid};
use crate::models::{Profile, ProfileChanges, SubscriptionType};

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: String,
    email: String,
    full_name: Option<String>,
    subscription_type: String,
    scans_used: i64,
    max_scans: i64,
    is_admin: bool,
    created_at: String,
    updated_at: String,
}

const PROFILE_COLUMNS: &str = "id, email, full_name, subscription_type, scans_used, max_scans, \
                               is_admin, created_at, updated_at";

pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM user_profiles WHERE id = ?",
            PROFILE_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch profile")?;

        row.map(row_to_profile).transpose()
    }

    /// All profiles, newest first
    pub async fn list(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM user_profiles ORDER BY created_at DESC",
            PROFILE_COLUMNS
        ))
        .fetch_all(self.pool)
        .await
        .context("Failed to list profiles")?;

        rows.into_iter().map(row_to_profile).collect()
    }

    pub async fn create(&self, profile: &Profile) -> Result<Profile> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles
                (id, email, full_name, subscription_type, scans_used, max_scans, is_admin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(profile.id.to_string())
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(profile.subscription_type.as_str())
        .bind(profile.scans_used)
        .bind(profile.max_scans)
        .bind(profile.is_admin)
        .bind(format_db_timestamp(profile.created_at))
        .bind(format_db_timestamp(profile.updated_at))
        .execute(self.pool)
        .await
        .context("Failed to create profile")?;

        self.get(profile.id)
            .await?
            .context("Failed to retrieve created profile")
    }

    /// Overwrite the mutable fields; `None` when the profile does not exist
    pub async fn update(&self, id: Uuid, changes: &ProfileChanges) -> Result<Option<Profile>> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET full_name = ?, subscription_type = ?, scans_used = ?, max_scans = ?, is_admin = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.full_name)
        .bind(changes.subscription_type.as_str())
        .bind(changes.scans_used)
        .bind(changes.max_scans)
        .bind(changes.is_admin)
        .bind(format_db_timestamp(Utc::now()))
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update profile")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Quota check: admin, premium, or under the limit. Unknown profiles may not scan.
    pub async fn can_user_scan(&self, id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT (is_admin = 1 OR subscription_type = 'premium' OR scans_used < max_scans) AS allowed
            FROM user_profiles
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to check scan quota")?;

        match row {
            Some(r) => Ok(r.try_get::<i64, _>("allowed")? != 0),
            None => Ok(false),
        }
    }

    /// Quota increment, a single statement so concurrent increments are not lost
    pub async fn increment_scan_count(&self, id: Uuid) -> Result<Option<Profile>> {
        let result = sqlx::query(
            "UPDATE user_profiles SET scans_used = scans_used + 1, updated_at = ? WHERE id = ?",
        )
        .bind(format_db_timestamp(Utc::now()))
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to increment scan count")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// (total, premium, admin) profile counts
    pub async fn counts(&self) -> Result<(i64, i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(CASE WHEN subscription_type = 'premium' THEN 1 ELSE 0 END), 0) AS premium,
                   COALESCE(SUM(CASE WHEN is_admin = 1 THEN 1 ELSE 0 END), 0) AS admins
            FROM user_profiles
            "#,
        )
        .fetch_one(self.pool)
        .await
        .context("Failed to count profiles")?;

        Ok((
            row.try_get("total")?,
            row.try_get("premium")?,
            row.try_get("admins")?,
        ))
    }
}

fn row_to_profile(row: ProfileRow) -> Result<Profile> {
    let subscription_type = row
        .subscription_type
        .parse::<SubscriptionType>()
        .map_err(anyhow::Error::msg)?;

    Ok(Profile {
        id: parse_uuid(&row.id, "profile")?,
        email: row.email,
        full_name: row.full_name,
        subscription_type,
        scans_used: row.scans_used,
        max_scans: row.max_scans,
        is_admin: row.is_admin,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    })
}
