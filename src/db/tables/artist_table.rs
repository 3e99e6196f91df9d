//! Artist table operations

use chrono::Utc;
use sqlx::{Acquire, Sqlite, SqliteExecutor};

use super::like_pattern;
use crate::models::{Artist, ArtistInput};

const ARTIST_COLUMNS: &str = "id, name, bio, image_url, created_at, updated_at";

/// Artist table operations
pub struct ArtistTable;

impl ArtistTable {
    /// Get all artists ordered by name
    pub async fn all<'e, E: SqliteExecutor<'e>>(db: E) -> sqlx::Result<Vec<Artist>> {
        sqlx::query_as(&format!(
            "SELECT {} FROM artists ORDER BY name COLLATE NOCASE ASC, id ASC",
            ARTIST_COLUMNS
        ))
        .fetch_all(db)
        .await
    }

    /// Get artist by ID
    pub async fn get_by_id<'e, E: SqliteExecutor<'e>>(
        db: E,
        id: i64,
    ) -> sqlx::Result<Option<Artist>> {
        sqlx::query_as(&format!("SELECT {} FROM artists WHERE id = ?", ARTIST_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Insert artist
    pub async fn insert<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        input: &ArtistInput,
    ) -> sqlx::Result<Artist> {
        let mut conn = db.acquire().await?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO artists (name, bio, image_url, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.bio)
        .bind(&input.image_url)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Self::get_by_id(&mut *conn, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Replace artist fields; `None` when the artist does not exist
    pub async fn update<'a, A: Acquire<'a, Database = Sqlite>>(
        db: A,
        id: i64,
        input: &ArtistInput,
    ) -> sqlx::Result<Option<Artist>> {
        let mut conn = db.acquire().await?;

        let result = sqlx::query(
            "UPDATE artists SET name = ?, bio = ?, image_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.bio)
        .bind(&input.image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get_by_id(&mut *conn, id).await
    }

    /// Delete artist; fails with a foreign-key violation while albums or songs reference it
    pub async fn delete<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM artists WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring match on name
    pub async fn search_by_name<'e, E: SqliteExecutor<'e>>(
        db: E,
        term: &str,
    ) -> sqlx::Result<Vec<Artist>> {
        sqlx::query_as(&format!(
            "SELECT {} FROM artists WHERE name LIKE ? ESCAPE '\\' \
             ORDER BY name COLLATE NOCASE ASC, id ASC",
            ARTIST_COLUMNS
        ))
        .bind(like_pattern(term))
        .fetch_all(db)
        .await
    }
}
