//! Authentication service
//!
//! Provides password hashing with Argon2 and identity storage.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::{format_db_timestamp, parse_db_timestamp, parse_uuid};
use crate::models::User;

/// Identity storage and credential checks
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(password_hash)
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Authenticate an identity by email and password
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        match self.get_user_by_email(email).await? {
            Some(user) if Self::verify_password(password, &user.password_hash)? => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch user by email")?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to fetch user by ID")?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Create a new identity; fails if the email is taken
    pub async fn create_user(&self, email: &str, password: &str) -> Result<User> {
        if self.get_user_by_email(email).await?.is_some() {
            anyhow::bail!("Email already exists");
        }

        let user = User::new(email.to_string(), Self::hash_password(password)?);

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(format_db_timestamp(user.created_at))
        .bind(format_db_timestamp(user.updated_at))
        .execute(self.pool)
        .await
        .context("Failed to create user")?;

        Ok(user)
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(User {
        id: parse_uuid(&id, "user")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: parse_db_timestamp(&created_at),
        updated_at: parse_db_timestamp(&updated_at),
    })
}
