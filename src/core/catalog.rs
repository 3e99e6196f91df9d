//! Artist, album and song management
//!
//! Writes keep two rules the schema cannot express on its own: a song's
//! artist is always its album's artist, and artists and albums are never
//! deleted while something still references them.
//!
//! Multi-statement writes always lead with the write itself, so a transaction
//! takes the database write lock on its first statement and never has to
//! upgrade a read snapshot.

use sqlx::SqliteConnection;
use tracing::info;

use crate::db::{AlbumTable, ArtistTable, DbEngine, PlaylistTable, SongTable};
use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::models::{
    Album, AlbumInput, AlbumWithArtist, Artist, ArtistInput, PlayInfo, Song, SongDetail, SongInput,
};

const ARTIST_IN_USE: &str =
    "Cannot delete artist: They may have associated albums or songs. Please delete them first.";
const ALBUM_IN_USE: &str = "Cannot delete album: It may have associated songs. Please delete them first.";
const SONG_IN_USE: &str =
    "Cannot delete song: It is part of one or more playlists. Remove it from them first.";

/// Catalog of artists, albums and songs
#[derive(Debug, Clone)]
pub struct CatalogStore {
    db: DbEngine,
}

impl CatalogStore {
    pub fn new(db: DbEngine) -> Self {
        Self { db }
    }

    // ---- artists ----

    pub async fn artists(&self) -> AppResult<Vec<Artist>> {
        Ok(ArtistTable::all(self.db.pool()).await?)
    }

    pub async fn artist(&self, id: i64) -> AppResult<Artist> {
        ArtistTable::get_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Artist not found"))
    }

    pub async fn create_artist(&self, input: &ArtistInput) -> AppResult<Artist> {
        let artist = ArtistTable::insert(self.db.pool(), input).await?;
        info!("Created artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    pub async fn update_artist(&self, id: i64, input: &ArtistInput) -> AppResult<Artist> {
        ArtistTable::update(self.db.pool(), id, input)
            .await?
            .ok_or_else(|| AppError::not_found("Artist not found"))
    }

    /// Delete an artist that nothing references; returns the removed row
    pub async fn delete_artist(&self, id: i64) -> AppResult<Artist> {
        let artist = self.artist(id).await?;

        match ArtistTable::delete(self.db.pool(), id).await {
            Ok(true) => {
                info!("Deleted artist {}", id);
                Ok(artist)
            }
            Ok(false) => Err(AppError::not_found("Artist not found or already deleted")),
            Err(err) if is_foreign_key_violation(&err) => Err(AppError::conflict(ARTIST_IN_USE)),
            Err(err) => Err(err.into()),
        }
    }

    /// Albums of an artist, newest release first
    pub async fn artist_albums(&self, artist_id: i64) -> AppResult<Vec<Album>> {
        let pool = self.db.pool();
        if ArtistTable::get_by_id(pool, artist_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Artist with ID {} not found.",
                artist_id
            )));
        }

        let albums = AlbumTable::by_artist(pool, artist_id).await?;
        if albums.is_empty() {
            return Err(AppError::not_found(format!(
                "No albums found for artist ID {}.",
                artist_id
            )));
        }
        Ok(albums)
    }

    // ---- albums ----

    pub async fn albums(&self) -> AppResult<Vec<AlbumWithArtist>> {
        Ok(AlbumTable::all(self.db.pool()).await?)
    }

    pub async fn album(&self, id: i64) -> AppResult<AlbumWithArtist> {
        AlbumTable::get_detail(self.db.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Album not found"))
    }

    pub async fn create_album(&self, input: &AlbumInput) -> AppResult<Album> {
        let album = match AlbumTable::insert(self.db.pool(), input).await {
            Ok(album) => album,
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(missing_artist(input.artist_id))
            }
            Err(err) => return Err(err.into()),
        };

        info!("Created album {} ({})", album.id, album.title);
        Ok(album)
    }

    /// Update an album; moving it to another artist is refused while it has songs
    pub async fn update_album(&self, id: i64, input: &AlbumInput) -> AppResult<Album> {
        let mut tx = self.db.pool().begin().await?;

        let album = match AlbumTable::update(&mut *tx, id, input).await {
            Ok(Some(album)) => album,
            Ok(None) => return Err(AppError::not_found("Album not found")),
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(missing_artist(input.artist_id))
            }
            Err(err) => return Err(err.into()),
        };

        // dropping the transaction rolls the update back
        if AlbumTable::foreign_song_count(&mut *tx, id, album.artist_id).await? > 0 {
            return Err(AppError::conflict(
                "Cannot change the artist of an album that has songs.",
            ));
        }

        tx.commit().await?;
        Ok(album)
    }

    pub async fn delete_album(&self, id: i64) -> AppResult<AlbumWithArtist> {
        let album = self.album(id).await?;

        match AlbumTable::delete(self.db.pool(), id).await {
            Ok(true) => {
                info!("Deleted album {}", id);
                Ok(album)
            }
            Ok(false) => Err(AppError::not_found("Album not found or already deleted")),
            Err(err) if is_foreign_key_violation(&err) => Err(AppError::conflict(ALBUM_IN_USE)),
            Err(err) => Err(err.into()),
        }
    }

    /// Songs of an album by track number
    pub async fn album_songs(&self, album_id: i64) -> AppResult<Vec<SongDetail>> {
        let pool = self.db.pool();
        if AlbumTable::get_by_id(pool, album_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Album with ID {} not found.",
                album_id
            )));
        }

        let songs = SongTable::by_album(pool, album_id).await?;
        if songs.is_empty() {
            return Err(AppError::not_found(format!(
                "No songs found for album ID {}.",
                album_id
            )));
        }
        Ok(songs)
    }

    // ---- songs ----

    pub async fn songs(&self) -> AppResult<Vec<SongDetail>> {
        Ok(SongTable::all(self.db.pool()).await?)
    }

    pub async fn song(&self, id: i64) -> AppResult<SongDetail> {
        SongTable::get_detail(self.db.pool(), id)
            .await?
            .ok_or_else(|| AppError::not_found("Song not found"))
    }

    pub async fn create_song(&self, input: &SongInput) -> AppResult<Song> {
        let mut tx = self.db.pool().begin().await?;

        let song = match SongTable::insert(&mut *tx, input).await {
            Ok(song) => song,
            Err(err) => return Err(song_write_error(&mut tx, input, err).await),
        };
        check_album_artist(&mut tx, &song).await?;

        tx.commit().await?;
        info!("Created song {} ({})", song.id, song.title);
        Ok(song)
    }

    pub async fn update_song(&self, id: i64, input: &SongInput) -> AppResult<Song> {
        let mut tx = self.db.pool().begin().await?;

        let song = match SongTable::update(&mut *tx, id, input).await {
            Ok(Some(song)) => song,
            Ok(None) => return Err(AppError::not_found("Song not found")),
            Err(err) => return Err(song_write_error(&mut tx, input, err).await),
        };
        check_album_artist(&mut tx, &song).await?;

        tx.commit().await?;
        Ok(song)
    }

    /// Delete a song no playlist links to; returns the removed row
    pub async fn delete_song(&self, id: i64) -> AppResult<SongDetail> {
        let song = self.song(id).await?;
        let pool = self.db.pool();

        if PlaylistTable::song_is_linked(pool, id).await? {
            return Err(AppError::conflict(SONG_IN_USE));
        }

        match SongTable::delete(pool, id).await {
            Ok(true) => {
                info!("Deleted song {}", id);
                Ok(song)
            }
            Ok(false) => Err(AppError::not_found("Song not found or already deleted")),
            Err(err) if is_foreign_key_violation(&err) => Err(AppError::conflict(SONG_IN_USE)),
            Err(err) => Err(err.into()),
        }
    }

    /// Count one play and return what a player needs to start the song
    pub async fn play(&self, id: i64) -> AppResult<PlayInfo> {
        let mut tx = self.db.pool().begin().await?;

        if SongTable::increment_plays(&mut *tx, id).await?.is_none() {
            return Err(AppError::not_found("Song not found"));
        }
        let song = SongTable::get_detail(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Song not found"))?;

        tx.commit().await?;
        Ok(PlayInfo::from_detail(&song))
    }
}

fn missing_artist(artist_id: i64) -> AppError {
    AppError::not_found(format!("Artist with ID {} not found.", artist_id))
}

/// Translate a failed song write; foreign-key failures name the missing album or artist
async fn song_write_error(
    conn: &mut SqliteConnection,
    input: &SongInput,
    err: sqlx::Error,
) -> AppError {
    if !is_foreign_key_violation(&err) {
        return err.into();
    }

    match AlbumTable::get_by_id(&mut *conn, input.album_id).await {
        Ok(None) => {
            return AppError::not_found(format!("Album with ID {} not found.", input.album_id))
        }
        Ok(Some(_)) => {}
        Err(e) => return e.into(),
    }
    match ArtistTable::get_by_id(&mut *conn, input.artist_id).await {
        Ok(None) => missing_artist(input.artist_id),
        Ok(Some(_)) => err.into(),
        Err(e) => e.into(),
    }
}

/// The song's artist must be its album's artist
async fn check_album_artist(conn: &mut SqliteConnection, song: &Song) -> AppResult<()> {
    let album = AlbumTable::get_by_id(&mut *conn, song.album_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Album with ID {} not found.", song.album_id))
        })?;

    if album.artist_id != song.artist_id {
        return Err(AppError::ArtistAlbumMismatch {
            song_artist: song.artist_id,
            album_artist: album.artist_id,
        });
    }
    Ok(())
}
