//! API key repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_db_timestamp, parse_db_timestamp, parse_uuid};
use crate::models::ApiKey;

#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: String,
    service_name: String,
    api_key: String,
    is_active: bool,
    created_by: Option<String>,
    created_at: String,
    updated_at: String,
}

pub struct ApiKeyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApiKeyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<ApiKey>> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, service_name, api_key, is_active, created_by, created_at, updated_at
            FROM api_keys
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list api keys")?;

        rows.into_iter().map(row_to_api_key).collect()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ApiKey>> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, service_name, api_key, is_active, created_by, created_at, updated_at
            FROM api_keys
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get api key")?;

        row.map(row_to_api_key).transpose()
    }

    /// Most recently updated active key for a service
    pub async fn find_active(&self, service_name: &str) -> Result<Option<ApiKey>> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, service_name, api_key, is_active, created_by, created_at, updated_at
            FROM api_keys
            WHERE service_name = ? AND is_active = 1
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(service_name)
        .fetch_optional(self.pool)
        .await
        .context("Failed to look up active api key")?;

        row.map(row_to_api_key).transpose()
    }

    pub async fn create(
        &self,
        service_name: &str,
        api_key: &str,
        is_active: bool,
        created_by: Option<Uuid>,
    ) -> Result<ApiKey> {
        let id = Uuid::new_v4();
        let now = format_db_timestamp(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, service_name, api_key, is_active, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(service_name)
        .bind(api_key)
        .bind(is_active)
        .bind(created_by.map(|u| u.to_string()))
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create api key")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created api key")
    }

    /// Activate or deactivate a key; `None` when it does not exist
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<ApiKey>> {
        let result = sqlx::query("UPDATE api_keys SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(is_active)
            .bind(format_db_timestamp(Utc::now()))
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to update api key")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete api key")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_api_key(row: ApiKeyRow) -> Result<ApiKey> {
    Ok(ApiKey {
        id: parse_uuid(&row.id, "api key")?,
        service_name: row.service_name,
        api_key: row.api_key,
        is_active: row.is_active,
        created_by: row
            .created_by
            .as_deref()
            .map(|s| parse_uuid(s, "user"))
            .transpose()?,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    })
}
