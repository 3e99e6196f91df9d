//! Album model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ArtistRef;

/// An album row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist_id: i64,
    /// ISO-8601 calendar date
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated album fields for create/update
#[derive(Debug, Clone, Default)]
pub struct AlbumInput {
    pub title: String,
    pub artist_id: i64,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub cover_image_url: Option<String>,
}

/// Album joined with its artist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumWithArtist {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub artist: ArtistRef,
}

/// Reference to an album embedded in song payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}
