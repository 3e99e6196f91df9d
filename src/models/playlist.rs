//! Playlist models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{AlbumRef, ArtistRef};

/// A playlist, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Playlist {
    /// Database ID
    pub id: i64,
    /// Owner user ID (immutable)
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Playlist with its current song count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub song_count: i64,
}

/// One row of the playlist/song join relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PlaylistSongLink {
    pub id: i64,
    pub playlist_id: i64,
    pub song_id: i64,
    pub added_at: DateTime<Utc>,
}

/// A song as listed inside a playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub id: i64,
    pub title: String,
    pub duration_seconds: Option<i64>,
    pub file_url: Option<String>,
    pub plays: i64,
    pub album: AlbumRef,
    pub artist: ArtistRef,
    pub added_at: DateTime<Utc>,
}

/// Playlist detail: the playlist plus its songs in the order they were added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistWithSongs {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub songs: Vec<PlaylistTrack>,
}
