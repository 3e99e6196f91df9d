//! Data models
//!
//! This module contains the catalog, account and playlist structures shared
//! by the database layer, the services and the HTTP handlers.

mod album;
mod artist;
mod playlist;
mod song;
mod user;

pub use album::{Album, AlbumInput, AlbumRef, AlbumWithArtist};
pub use artist::{Artist, ArtistInput, ArtistRef};
pub use playlist::{Playlist, PlaylistSongLink, PlaylistSummary, PlaylistTrack, PlaylistWithSongs};
pub use song::{PlayInfo, Song, SongDetail, SongInput};
pub use user::User;
