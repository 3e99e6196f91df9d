//! Playlist ownership and playlist/song membership
//!
//! Every operation is scoped to the calling user. A playlist the caller does
//! not own looks exactly like one that does not exist.

use tracing::{debug, info};

use crate::db::{DbEngine, PlaylistTable};
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError, AppResult};
use crate::models::{Playlist, PlaylistSongLink, PlaylistSummary, PlaylistWithSongs};

const NOT_OWNED: &str = "Forbidden: You do not own this playlist or playlist not found.";
const NOT_OWNED_DELETE: &str = "Playlist not found or you do not own this playlist.";

fn forbidden() -> AppError {
    AppError::Forbidden(NOT_OWNED.to_string())
}

/// Playlist operations for authenticated owners
#[derive(Debug, Clone)]
pub struct PlaylistService {
    db: DbEngine,
}

impl PlaylistService {
    pub fn new(db: DbEngine) -> Self {
        Self { db }
    }

    /// Create an empty playlist owned by `owner_id`
    pub async fn create(
        &self,
        owner_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> AppResult<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Playlist name is required"));
        }
        let description = description.map(str::trim).filter(|d| !d.is_empty());

        let playlist = PlaylistTable::insert(self.db.pool(), owner_id, name, description).await?;
        info!("User {} created playlist {}", owner_id, playlist.id);
        Ok(playlist)
    }

    /// All of the owner's playlists with song counts, by name
    pub async fn list_for_owner(&self, owner_id: i64) -> AppResult<Vec<PlaylistSummary>> {
        Ok(PlaylistTable::list_for_owner(self.db.pool(), owner_id).await?)
    }

    /// Playlist plus its songs in the order they were added
    pub async fn get_detail(&self, playlist_id: i64, owner_id: i64) -> AppResult<PlaylistWithSongs> {
        // one read transaction so the playlist and its songs come from the same snapshot
        let mut tx = self.db.pool().begin().await?;

        let playlist = PlaylistTable::get_owned(&mut *tx, playlist_id, owner_id)
            .await?
            .ok_or_else(forbidden)?;
        let songs = PlaylistTable::songs(&mut *tx, playlist_id).await?;

        tx.commit().await?;
        Ok(PlaylistWithSongs { playlist, songs })
    }

    /// Link a song to an owned playlist
    pub async fn add_song(
        &self,
        playlist_id: i64,
        song_id: i64,
        owner_id: i64,
    ) -> AppResult<PlaylistSongLink> {
        let pool = self.db.pool();

        if PlaylistTable::get_owned(pool, playlist_id, owner_id)
            .await?
            .is_none()
        {
            return Err(forbidden());
        }
        if PlaylistTable::link_exists(pool, playlist_id, song_id).await? {
            return Err(AppError::DuplicateSong);
        }

        // the UNIQUE key still decides if another request linked the song meanwhile
        let mut tx = pool.begin().await?;
        let link = match PlaylistTable::insert_link(&mut *tx, playlist_id, song_id).await {
            Ok(link) => link,
            Err(err) if is_unique_violation(&err) => return Err(AppError::DuplicateSong),
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(AppError::not_found("Playlist or Song not found."))
            }
            Err(err) => return Err(err.into()),
        };
        PlaylistTable::touch(&mut *tx, playlist_id).await?;
        tx.commit().await?;

        debug!("Added song {} to playlist {}", song_id, playlist_id);
        Ok(link)
    }

    /// Unlink a song from an owned playlist
    pub async fn remove_song(&self, playlist_id: i64, song_id: i64, owner_id: i64) -> AppResult<()> {
        // the write goes first so the transaction holds the write lock from its first statement
        let mut tx = self.db.pool().begin().await?;

        if !PlaylistTable::delete_owned_link(&mut *tx, playlist_id, song_id, owner_id).await? {
            if PlaylistTable::get_owned(&mut *tx, playlist_id, owner_id)
                .await?
                .is_none()
            {
                return Err(forbidden());
            }
            return Err(AppError::not_found(
                "Song not found in this playlist or already removed.",
            ));
        }
        PlaylistTable::touch(&mut *tx, playlist_id).await?;

        tx.commit().await?;
        debug!("Removed song {} from playlist {}", song_id, playlist_id);
        Ok(())
    }

    /// Delete an owned playlist together with all of its song links
    pub async fn delete(&self, playlist_id: i64, owner_id: i64) -> AppResult<i64> {
        // one statement; playlist_songs rows follow through ON DELETE CASCADE
        if !PlaylistTable::delete_owned(self.db.pool(), playlist_id, owner_id).await? {
            return Err(AppError::not_found(NOT_OWNED_DELETE));
        }

        info!("User {} deleted playlist {}", owner_id, playlist_id);
        Ok(playlist_id)
    }
}
