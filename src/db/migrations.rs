//! Database migrations

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Schema steps, applied in order; index + 1 is the version number
const MIGRATIONS: &[&str] = &[
    // 1: catalog, accounts and playlists
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS artists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        bio TEXT,
        image_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS albums (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        artist_id INTEGER NOT NULL REFERENCES artists(id),
        release_date TEXT,
        genre TEXT,
        cover_image_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS songs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        album_id INTEGER NOT NULL REFERENCES albums(id),
        artist_id INTEGER NOT NULL REFERENCES artists(id),
        duration_seconds INTEGER,
        track_number INTEGER,
        file_url TEXT,
        plays INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS playlists (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        name TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS playlist_songs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        playlist_id INTEGER NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
        song_id INTEGER NOT NULL REFERENCES songs(id),
        added_at TEXT NOT NULL,
        UNIQUE (playlist_id, song_id)
    );
    "#,
    // 2: lookup indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_albums_artist_id ON albums(artist_id);
    CREATE INDEX IF NOT EXISTS idx_songs_album_id ON songs(album_id);
    CREATE INDEX IF NOT EXISTS idx_songs_artist_id ON songs(artist_id);
    CREATE INDEX IF NOT EXISTS idx_playlists_user_id ON playlists(user_id);
    CREATE INDEX IF NOT EXISTS idx_playlist_songs_song_id ON playlist_songs(song_id);
    "#,
];

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dbmigration (
            id INTEGER PRIMARY KEY,
            version INTEGER NOT NULL DEFAULT 0
        );
        INSERT OR IGNORE INTO dbmigration (id, version) VALUES (1, 0);
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migration table")?;

    let current_version: i64 = sqlx::query_scalar("SELECT version FROM dbmigration WHERE id = 1")
        .fetch_one(pool)
        .await?;
    let target_version = MIGRATIONS.len() as i64;

    if current_version >= target_version {
        info!("Database is up to date (version {})", current_version);
        return Ok(());
    }

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let version = idx as i64 + 1;
        if version <= current_version {
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::query(sql)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Migration {} failed", version))?;
        sqlx::query("UPDATE dbmigration SET version = ? WHERE id = 1")
            .bind(version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Applied migration {}", version);
    }

    Ok(())
}
