//! Song table operations

use chrono::{DateTime, Utc};
use sqlx::{Acquire, FromRow, Sqlite, SqliteExecutor};

use super::like_pattern;
use crate::models::{AlbumRef, ArtistRef, Song, SongDetail, SongInput};

const SONG_COLUMNS: &str = "id, title, album_id, artist_id, duration_seconds, track_number, \
                            file_url, plays, created_at, updated_at";

const SONG_DETAIL: &str = r#"
    SELECT s.id, s.title, s.duration_seconds, s.track_number, s.file_url, s.plays,
           s.created_at, s.updated_at,
           al.id AS album_id, al.title AS album_title, al.cover_image_url AS album_cover_image_url,
           ar.id AS artist_id, ar.name AS artist_name
    FROM songs s
    JOIN albums al ON s.album_id = al.id
    JOIN artists ar ON s.artist_id = ar.id
"#;

/// Database row for a song joined with its album and artist
#[derive(Debug, FromRow)]
struct SongRow {
    id: i64,
    title: String,
    duration_seconds: Option<i64>,
    track_number: Option<i64>,
    file_url: Option<String>,
    plays: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    album_id: i64,
    album_title: String,
    album_cover_image_url: Option<String>,
    artist_id: i64,
    artist_name: String,
}

impl SongRow {
    fn into_song(self) -> SongDetail {
        SongDetail {
            id: self.id,
            title: self.title,
            duration_seconds: self.duration_seconds,
            track_number: self.track_number,
            file_url: self.file_url,
            plays: self.plays,
            created_at: self.created_at,
            updated_at: self.updated_at,
            album: AlbumRef {
                id: self.album_id,
                title: self.album_title,
                cover_image_url: self.album_cover_image_url,
            },
            artist: ArtistRef {
                id: self.artist_id,
                name: self.artist_name,
            },
        }
    }
}

/// Song table operations
pub struct SongTable;

impl SongTable {
    /// Get all songs ordered by artist, album and track number
    pub async fn all<'e, E: SqliteExecutor<'e>>(db: E) -> sqlx::Result<Vec<SongDetail>> {
        let rows: Vec<SongRow> = sqlx::query_as(&format!(
            "{} ORDER BY ar.name COLLATE NOCASE ASC, al.title COLLATE NOCASE ASC, \
             s.track_number ASC, s.id ASC",
            SONG_DETAIL
        ))
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(SongRow::into_song).collect())
    }

    /// Get the raw song row
    pub async fn get_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Song>> {
        sqlx::query_as(&format!("SELECT {} FROM songs WHERE id = ?", SONG_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Get song with album and artist
    pub async fn get_detail<'e, E: SqliteExecutor<'e>>(
        db: E,
        id: i64,
    ) -> sqlx::Result<Option<SongDetail>> {
        let row: Option<SongRow> = sqlx::query_as(&format!("{} WHERE s.id = ?", SONG_DETAIL))
            .bind(id)
            .fetch_optional(db)
            .await?;

        Ok(row.map(SongRow::into_song))
    }

    /// Songs on an album by track number
    pub async fn by_album<'e, E: SqliteExecutor<'e>>(
        db: E,
        album_id: i64,
    ) -> sqlx::Result<Vec<SongDetail>> {
        let rows: Vec<SongRow> = sqlx::query_as(&format!(
            "{} WHERE s.album_id = ? ORDER BY s.track_number ASC, s.id ASC",
            SONG_DETAIL
        ))
        .bind(album_id)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(SongRow::into_song).collect())
    }

    /// Insert song; fails with a foreign-key violation when the album or artist is missing
    pub async fn insert<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        input: &SongInput,
    ) -> sqlx::Result<Song> {
        let mut conn = db.acquire().await?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO songs (title, album_id, artist_id, duration_seconds, track_number, file_url, \
             created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(input.album_id)
        .bind(input.artist_id)
        .bind(input.duration_seconds)
        .bind(input.track_number)
        .bind(&input.file_url)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Self::get_by_id(&mut *conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Replace song fields; `None` when the song does not exist
    pub async fn update<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        id: i64,
        input: &SongInput,
    ) -> sqlx::Result<Option<Song>> {
        let mut conn = db.acquire().await?;

        let result = sqlx::query(
            "UPDATE songs SET title = ?, album_id = ?, artist_id = ?, duration_seconds = ?, \
             track_number = ?, file_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&input.title)
        .bind(input.album_id)
        .bind(input.artist_id)
        .bind(input.duration_seconds)
        .bind(input.track_number)
        .bind(&input.file_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get_by_id(&mut *conn, id).await
    }

    /// Delete song; fails with a foreign-key violation while a playlist links it
    pub async fn delete<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bump the play counter, returning the new value
    pub async fn increment_plays<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        id: i64,
    ) -> sqlx::Result<Option<i64>> {
        let mut conn = db.acquire().await?;

        let result = sqlx::query("UPDATE songs SET plays = plays + 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        sqlx::query_scalar("SELECT plays FROM songs WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Case-insensitive substring match on title
    pub async fn search_by_title<'e, E: SqliteExecutor<'e>>(
        db: E,
        term: &str,
    ) -> sqlx::Result<Vec<SongDetail>> {
        let rows: Vec<SongRow> = sqlx::query_as(&format!(
            "{} WHERE s.title LIKE ? ESCAPE '\\' ORDER BY s.title COLLATE NOCASE ASC, s.id ASC",
            SONG_DETAIL
        ))
        .bind(like_pattern(term))
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(SongRow::into_song).collect())
    }
}
