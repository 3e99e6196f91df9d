//! Album table operations

use chrono::{DateTime, Utc};
use sqlx::{Acquire, FromRow, Sqlite, SqliteExecutor};

use super::like_pattern;
use crate::models::{Album, AlbumInput, AlbumWithArtist, ArtistRef};

const ALBUM_COLUMNS: &str =
    "id, title, artist_id, release_date, genre, cover_image_url, created_at, updated_at";

const ALBUM_WITH_ARTIST: &str = r#"
    SELECT a.id, a.title, a.release_date, a.genre, a.cover_image_url,
           a.created_at, a.updated_at,
           ar.id AS artist_id, ar.name AS artist_name
    FROM albums a
    JOIN artists ar ON a.artist_id = ar.id
"#;

/// Database row for an album joined with its artist
#[derive(Debug, FromRow)]
struct AlbumRow {
    id: i64,
    title: String,
    release_date: Option<String>,
    genre: Option<String>,
    cover_image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    artist_id: i64,
    artist_name: String,
}

impl AlbumRow {
    fn into_album(self) -> AlbumWithArtist {
        AlbumWithArtist {
            id: self.id,
            title: self.title,
            release_date: self.release_date,
            genre: self.genre,
            cover_image_url: self.cover_image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
            artist: ArtistRef {
                id: self.artist_id,
                name: self.artist_name,
            },
        }
    }
}

/// Album table operations
pub struct AlbumTable;

impl AlbumTable {
    /// Get all albums with their artist, ordered by title
    pub async fn all<'e, E: SqliteExecutor<'e>>(db: E) -> sqlx::Result<Vec<AlbumWithArtist>> {
        let rows: Vec<AlbumRow> = sqlx::query_as(&format!(
            "{} ORDER BY a.title COLLATE NOCASE ASC, a.id ASC",
            ALBUM_WITH_ARTIST
        ))
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(AlbumRow::into_album).collect())
    }

    /// Get the raw album row
    pub async fn get_by_id<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Album>> {
        sqlx::query_as(&format!("SELECT {} FROM albums WHERE id = ?", ALBUM_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Get album with its artist
    pub async fn get_detail<'e, E: SqliteExecutor<'e>>(
        db: E,
        id: i64,
    ) -> sqlx::Result<Option<AlbumWithArtist>> {
        let row: Option<AlbumRow> = sqlx::query_as(&format!("{} WHERE a.id = ?", ALBUM_WITH_ARTIST))
            .bind(id)
            .fetch_optional(db)
            .await?;

        Ok(row.map(AlbumRow::into_album))
    }

    /// Albums by an artist, newest release first
    pub async fn by_artist<'e, E: SqliteExecutor<'e>>(
        db: E,
        artist_id: i64,
    ) -> sqlx::Result<Vec<Album>> {
        sqlx::query_as(&format!(
            "SELECT {} FROM albums WHERE artist_id = ? ORDER BY release_date DESC, id ASC",
            ALBUM_COLUMNS
        ))
        .bind(artist_id)
        .fetch_all(db)
        .await
    }

    /// Insert album; fails with a foreign-key violation when the artist is missing
    pub async fn insert<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        input: &AlbumInput,
    ) -> sqlx::Result<Album> {
        let mut conn = db.acquire().await?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO albums (title, artist_id, release_date, genre, cover_image_url, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(input.artist_id)
        .bind(&input.release_date)
        .bind(&input.genre)
        .bind(&input.cover_image_url)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Self::get_by_id(&mut *conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Replace album fields; `None` when the album does not exist
    pub async fn update<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        id: i64,
        input: &AlbumInput,
    ) -> sqlx::Result<Option<Album>> {
        let mut conn = db.acquire().await?;

        let result = sqlx::query(
            "UPDATE albums SET title = ?, artist_id = ?, release_date = ?, genre = ?, \
             cover_image_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&input.title)
        .bind(input.artist_id)
        .bind(&input.release_date)
        .bind(&input.genre)
        .bind(&input.cover_image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get_by_id(&mut *conn, id).await
    }

    /// Delete album; fails with a foreign-key violation while songs reference it
    pub async fn delete<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM albums WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of songs on the album credited to an artist other than `artist_id`
    pub async fn foreign_song_count<'e, E: SqliteExecutor<'e>>(
        db: E,
        id: i64,
        artist_id: i64,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE album_id = ? AND artist_id != ?")
            .bind(id)
            .bind(artist_id)
            .fetch_one(db)
            .await
    }

    /// Case-insensitive substring match on title
    pub async fn search_by_title<'e, E: SqliteExecutor<'e>>(
        db: E,
        term: &str,
    ) -> sqlx::Result<Vec<AlbumWithArtist>> {
        let rows: Vec<AlbumRow> = sqlx::query_as(&format!(
            "{} WHERE a.title LIKE ? ESCAPE '\\' ORDER BY a.title COLLATE NOCASE ASC, a.id ASC",
            ALBUM_WITH_ARTIST
        ))
        .bind(like_pattern(term))
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(AlbumRow::into_album).collect())
    }
}
