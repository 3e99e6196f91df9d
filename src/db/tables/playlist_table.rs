//! Playlist table operations

use chrono::{DateTime, Utc};
use sqlx::{Acquire, FromRow, Sqlite, SqliteExecutor};

use crate::models::{
    AlbumRef, ArtistRef, Playlist, PlaylistSongLink, PlaylistSummary, PlaylistTrack,
};

const PLAYLIST_COLUMNS: &str = "id, user_id, name, description, created_at, updated_at";

/// Database row for a playlist with its song count
#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    user_id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    song_count: i64,
}

impl SummaryRow {
    fn into_summary(self) -> PlaylistSummary {
        PlaylistSummary {
            playlist: Playlist {
                id: self.id,
                user_id: self.user_id,
                name: self.name,
                description: self.description,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            song_count: self.song_count,
        }
    }
}

/// Database row for a song inside a playlist
#[derive(Debug, FromRow)]
struct TrackRow {
    id: i64,
    title: String,
    duration_seconds: Option<i64>,
    file_url: Option<String>,
    plays: i64,
    added_at: DateTime<Utc>,
    album_id: i64,
    album_title: String,
    album_cover_image_url: Option<String>,
    artist_id: i64,
    artist_name: String,
}

impl TrackRow {
    fn into_track(self) -> PlaylistTrack {
        PlaylistTrack {
            id: self.id,
            title: self.title,
            duration_seconds: self.duration_seconds,
            file_url: self.file_url,
            plays: self.plays,
            album: AlbumRef {
                id: self.album_id,
                title: self.album_title,
                cover_image_url: self.album_cover_image_url,
            },
            artist: ArtistRef {
                id: self.artist_id,
                name: self.artist_name,
            },
            added_at: self.added_at,
        }
    }
}

/// Playlist table operations
pub struct PlaylistTable;

impl PlaylistTable {
    /// Insert playlist
    pub async fn insert<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        user_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> sqlx::Result<Playlist> {
        let mut conn = db.acquire().await?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO playlists (user_id, name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Self::get_owned(&mut *conn, result.last_insert_rowid(), user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get playlist by ID only when `user_id` owns it
    pub async fn get_owned<'e, E: SqliteExecutor<'e>>(
        db: E,
        id: i64,
        user_id: i64,
    ) -> sqlx::Result<Option<Playlist>> {
        sqlx::query_as(&format!(
            "SELECT {} FROM playlists WHERE id = ? AND user_id = ?",
            PLAYLIST_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// All playlists of one owner with song counts, ordered by name
    pub async fn list_for_owner<'e, E: SqliteExecutor<'e>>(
        db: E,
        user_id: i64,
    ) -> sqlx::Result<Vec<PlaylistSummary>> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.user_id, p.name, p.description, p.created_at, p.updated_at,
                   COUNT(ps.id) AS song_count
            FROM playlists p
            LEFT JOIN playlist_songs ps ON ps.playlist_id = p.id
            WHERE p.user_id = ?
            GROUP BY p.id
            ORDER BY p.name COLLATE NOCASE ASC, p.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(SummaryRow::into_summary).collect())
    }

    /// Songs of a playlist in the order they were added
    pub async fn songs<'e, E: SqliteExecutor<'e>>(
        db: E,
        playlist_id: i64,
    ) -> sqlx::Result<Vec<PlaylistTrack>> {
        let rows: Vec<TrackRow> = sqlx::query_as(
            r#"
            SELECT s.id, s.title, s.duration_seconds, s.file_url, s.plays, ps.added_at,
                   al.id AS album_id, al.title AS album_title,
                   al.cover_image_url AS album_cover_image_url,
                   ar.id AS artist_id, ar.name AS artist_name
            FROM playlist_songs ps
            JOIN songs s ON ps.song_id = s.id
            JOIN albums al ON s.album_id = al.id
            JOIN artists ar ON s.artist_id = ar.id
            WHERE ps.playlist_id = ?
            ORDER BY ps.added_at ASC, ps.id ASC
            "#,
        )
        .bind(playlist_id)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(TrackRow::into_track).collect())
    }

    /// Check if a song is already linked to the playlist
    pub async fn link_exists<'e, E: SqliteExecutor<'e>>(
        db: E,
        playlist_id: i64,
        song_id: i64,
    ) -> sqlx::Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM playlist_songs WHERE playlist_id = ? AND song_id = ?",
        )
        .bind(playlist_id)
        .bind(song_id)
        .fetch_one(db)
        .await?;

        Ok(count > 0)
    }

    /// Link a song to the playlist; the (playlist_id, song_id) UNIQUE key rejects duplicates
    pub async fn insert_link<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        playlist_id: i64,
        song_id: i64,
    ) -> sqlx::Result<PlaylistSongLink> {
        let mut conn = db.acquire().await?;

        let result =
            sqlx::query("INSERT INTO playlist_songs (playlist_id, song_id, added_at) VALUES (?, ?, ?)")
                .bind(playlist_id)
                .bind(song_id)
                .bind(Utc::now())
                .execute(&mut *conn)
                .await?;

        sqlx::query_as("SELECT id, playlist_id, song_id, added_at FROM playlist_songs WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&mut *conn)
            .await
    }

    /// Remove a song link only when `user_id` owns the playlist; false when nothing was removed
    pub async fn delete_owned_link<'e, E: SqliteExecutor<'e>>(
        db: E,
        playlist_id: i64,
        song_id: i64,
        user_id: i64,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ? \
             AND playlist_id IN (SELECT id FROM playlists WHERE id = ? AND user_id = ?)",
        )
        .bind(playlist_id)
        .bind(song_id)
        .bind(playlist_id)
        .bind(user_id)
        .execute(db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bump the playlist's modification time
    pub async fn touch<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<()> {
        sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Delete the playlist if `user_id` owns it; its song links go with it via ON DELETE CASCADE
    pub async fn delete_owned<'e, E: SqliteExecutor<'e>>(
        db: E,
        id: i64,
        user_id: i64,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of songs in the playlist
    pub async fn count_links<'e, E: SqliteExecutor<'e>>(
        db: E,
        playlist_id: i64,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM playlist_songs WHERE playlist_id = ?")
            .bind(playlist_id)
            .fetch_one(db)
            .await
    }

    /// Check if any playlist links the song
    pub async fn song_is_linked<'e, E: SqliteExecutor<'e>>(
        db: E,
        song_id: i64,
    ) -> sqlx::Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_songs WHERE song_id = ?")
            .bind(song_id)
            .fetch_one(db)
            .await?;

        Ok(count > 0)
    }
}
