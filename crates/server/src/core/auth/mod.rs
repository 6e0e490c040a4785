//! Authentication Module
//!
//! Account storage, password hashing and identity tokens.
//! Accounts live in the `users` table of the shared SQLite database.

pub mod handlers;
pub mod middleware;
pub mod token;

use crate::core::error::{Error, Result};
use crate::core::models::{NewUser, User};
use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::ops::RangeInclusive;
use tracing::info;
use uuid::Uuid;

const USERNAME_LEN: RangeInclusive<usize> = 3..=20;
const PASSWORD_LEN: RangeInclusive<usize> = 3..=50;

/// Salted password hashing. bcrypt runs on the blocking pool so a slow
/// work factor does not stall the async workers.
#[derive(Debug, Clone)]
pub struct Credentials {
    cost: u32,
}

impl Credentials {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| Error::Internal(format!("password hashing task failed: {}", e)))??;
        Ok(hashed)
    }

    pub async fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let matches = tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .map_err(|e| Error::Internal(format!("password check task failed: {}", e)))??;
        Ok(matches)
    }
}

type UserRow = (String, String, Option<String>, String, String);

fn user_from_row((id, username, name, password_hash, created_at): UserRow) -> Result<User> {
    let created_at = created_at.parse::<DateTime<Utc>>().map_err(|e| {
        Error::Internal(format!("user {} has a corrupt created_at: {}", id, e))
    })?;

    Ok(User {
        id,
        username,
        name,
        password_hash,
        created_at,
    })
}

/// Account store
pub struct AccountManager {
    pool: SqlitePool,
}

impl AccountManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new account
    pub async fn create(&self, req: NewUser, credentials: &Credentials) -> Result<User> {
        let username = req.username.unwrap_or_default();
        let password = req.password.unwrap_or_default();

        if username.is_empty() || password.is_empty() {
            return Err(Error::BadRequest(
                "please enter a valid username and/or password".to_string(),
            ));
        }

        if self.find_by_username(&username).await?.is_some() {
            return Err(unique_violation());
        }

        if !USERNAME_LEN.contains(&username.chars().count()) {
            return Err(Error::BadRequest(
                "username must be between 3 - 20 characters in length".to_string(),
            ));
        }

        if !PASSWORD_LEN.contains(&password.chars().count()) {
            return Err(Error::BadRequest(
                "password must be between 3 - 50 characters in length".to_string(),
            ));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            name: req.name,
            password_hash: credentials.hash(&password).await?,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, name, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return unique_violation();
                }
            }
            Error::from(e)
        })?;

        info!("[Auth] User registered: {}", user.username);

        Ok(user)
    }

    /// Get account by ID
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    /// Get account by username (exact match)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    /// All accounts in registration order
    pub async fn list(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(user_from_row).collect()
    }
}

fn unique_violation() -> Error {
    Error::BadRequest("username must be unique".to_string())
}
