//! Artist model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An artist in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated artist fields for create/update
#[derive(Debug, Clone, Default)]
pub struct ArtistInput {
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

/// Reference to an artist embedded in album/song payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: i64,
    pub name: String,
}
