//! User table operations

use chrono::Utc;
use sqlx::{Acquire, Sqlite, SqliteExecutor};

use crate::models::User;

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// User table operations
pub struct UserTable;

impl UserTable {
    /// Insert a user; the UNIQUE constraints on username and email are the real guard
    pub async fn insert<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        let mut conn = db.acquire().await?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Self::get_by_id(&mut *conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get user by ID
    pub async fn get_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Get user by email
    pub async fn get_by_email<'e, E: SqliteExecutor<'e>>(
        db: E,
        email: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(db)
            .await
    }

    /// Get user by username
    pub async fn get_by_username<'e, E: SqliteExecutor<'e>>(
        db: E,
        username: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as(&format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS))
            .bind(username)
            .fetch_optional(db)
            .await
    }
}
