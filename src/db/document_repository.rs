//! Document repository, always scoped to the owning user

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_db_timestamp, parse_db_timestamp, parse_uuid};
use crate::models::{Document, NewDocument};

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    user_id: String,
    title: String,
    original_text: String,
    image_url: Option<String>,
    created_at: String,
    updated_at: String,
}

pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// The user's documents, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, user_id, title, original_text, image_url, created_at, updated_at
            FROM documents
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list documents")?;

        rows.into_iter().map(row_to_document).collect()
    }

    pub async fn get_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, user_id, title, original_text, image_url, created_at, updated_at
            FROM documents
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get document")?;

        row.map(row_to_document).transpose()
    }

    pub async fn create(&self, new: &NewDocument) -> Result<Document> {
        let id = Uuid::new_v4();
        let now = format_db_timestamp(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO documents (id, user_id, title, original_text, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(new.user_id.to_string())
        .bind(&new.title)
        .bind(&new.original_text)
        .bind(&new.image_url)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create document")?;

        self.get_for_user(new.user_id, id)
            .await?
            .context("Failed to retrieve created document")
    }

    pub async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE user_id = ? AND id = ?")
            .bind(user_id.to_string())
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete document")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM documents")
            .fetch_one(self.pool)
            .await
            .context("Failed to count documents")?;
        Ok(row.try_get("total")?)
    }
}

fn row_to_document(row: DocumentRow) -> Result<Document> {
    Ok(Document {
        id: parse_uuid(&row.id, "document")?,
        user_id: parse_uuid(&row.user_id, "user")?,
        title: row.title,
        original_text: row.original_text,
        image_url: row.image_url,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    })
}
