//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Database ID
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Unique, lowercased email address
    pub email: String,
    /// Password hash (never serialized)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
