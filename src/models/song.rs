//! Song model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{AlbumRef, ArtistRef};

/// A song row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub album_id: i64,
    /// Always equal to the artist of `album_id`
    pub artist_id: i64,
    pub duration_seconds: Option<i64>,
    pub track_number: Option<i64>,
    pub file_url: Option<String>,
    /// Monotonic play counter
    pub plays: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated song fields for create/update
#[derive(Debug, Clone, Default)]
pub struct SongInput {
    pub title: String,
    pub album_id: i64,
    pub artist_id: i64,
    pub duration_seconds: Option<i64>,
    pub track_number: Option<i64>,
    pub file_url: Option<String>,
}

/// Song joined with its album and artist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongDetail {
    pub id: i64,
    pub title: String,
    pub duration_seconds: Option<i64>,
    pub track_number: Option<i64>,
    pub file_url: Option<String>,
    pub plays: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub album: AlbumRef,
    pub artist: ArtistRef,
}

/// What a player needs to start a song
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayInfo {
    pub song_id: i64,
    pub title: String,
    pub artist_name: String,
    pub album_title: String,
    pub cover_art_url: Option<String>,
    pub file_url: Option<String>,
    pub plays: i64,
}

impl PlayInfo {
    pub fn from_detail(song: &SongDetail) -> Self {
        Self {
            song_id: song.id,
            title: song.title.clone(),
            artist_name: song.artist.name.clone(),
            album_title: song.album.title.clone(),
            cover_art_url: song.album.cover_image_url.clone(),
            file_url: song.file_url.clone(),
            plays: song.plays,
        }
    }
}
