//! Database table operations
//!
//! Reads take an executor, so the same call works against the pool or inside
//! a transaction (`&mut *tx`). Writes take anything that can hand out a
//! connection and re-read the written row on that same connection.

mod album_table;
mod artist_table;
mod playlist_table;
mod song_table;
mod user_table;

pub use album_table::AlbumTable;
pub use artist_table::ArtistTable;
pub use playlist_table::PlaylistTable;
pub use song_table::SongTable;
pub use user_table::UserTable;

/// Build a LIKE pattern matching `term` anywhere, with `\` as the escape character
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbEngine;
    use crate::models::{AlbumInput, ArtistInput, SongInput};

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("love"), "%love%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    async fn seed(db: &DbEngine) -> (i64, i64, i64) {
        let artist = ArtistTable::insert(
            db.pool(),
            &ArtistInput {
                name: "The Band".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let album = AlbumTable::insert(
            db.pool(),
            &AlbumInput {
                title: "First".into(),
                artist_id: artist.id,
                release_date: Some("2020-01-01".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let song = SongTable::insert(
            db.pool(),
            &SongInput {
                title: "Love 100% Song".into(),
                album_id: album.id,
                artist_id: artist.id,
                track_number: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        (artist.id, album.id, song.id)
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_literal() {
        let db = DbEngine::in_memory().await.unwrap();
        let (_, _, song_id) = seed(&db).await;

        let hits = SongTable::search_by_title(db.pool(), "LOVE").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, song_id);
        assert_eq!(hits[0].artist.name, "The Band");

        let hits = SongTable::search_by_title(db.pool(), "100%").await.unwrap();
        assert_eq!(hits.len(), 1);

        // '_' must not act as a single-character wildcard
        let hits = SongTable::search_by_title(db.pool(), "Love_100").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_song_detail_joins_album_and_artist() {
        let db = DbEngine::in_memory().await.unwrap();
        let (artist_id, album_id, song_id) = seed(&db).await;

        let song = SongTable::get_detail(db.pool(), song_id).await.unwrap().unwrap();
        assert_eq!(song.album.id, album_id);
        assert_eq!(song.album.title, "First");
        assert_eq!(song.artist.id, artist_id);
        assert_eq!(song.plays, 0);

        assert_eq!(SongTable::increment_plays(db.pool(), song_id).await.unwrap(), Some(1));
        assert_eq!(SongTable::increment_plays(db.pool(), song_id).await.unwrap(), Some(2));
        assert_eq!(SongTable::increment_plays(db.pool(), 999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_referenced_rows_is_rejected() {
        let db = DbEngine::in_memory().await.unwrap();
        let (artist_id, album_id, _) = seed(&db).await;

        let err = ArtistTable::delete(db.pool(), artist_id).await.unwrap_err();
        assert!(crate::error::is_foreign_key_violation(&err));

        let err = AlbumTable::delete(db.pool(), album_id).await.unwrap_err();
        assert!(crate::error::is_foreign_key_violation(&err));
        assert_eq!(
            AlbumTable::foreign_song_count(db.pool(), album_id, artist_id)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            AlbumTable::foreign_song_count(db.pool(), album_id, artist_id + 1)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_playlist_links() {
        let db = DbEngine::in_memory().await.unwrap();
        let (_, _, song_id) = seed(&db).await;
        let user = UserTable::insert(db.pool(), "u1", "u1@example.com", "x")
            .await
            .unwrap();
        let playlist = PlaylistTable::insert(db.pool(), user.id, "Mix", None)
            .await
            .unwrap();

        PlaylistTable::insert_link(db.pool(), playlist.id, song_id)
            .await
            .unwrap();
        let err = PlaylistTable::insert_link(db.pool(), playlist.id, song_id)
            .await
            .unwrap_err();
        assert!(crate::error::is_unique_violation(&err));

        let summaries = PlaylistTable::list_for_owner(db.pool(), user.id).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].song_count, 1);
        assert!(PlaylistTable::song_is_linked(db.pool(), song_id).await.unwrap());

        // Only the owner can unlink
        assert!(!PlaylistTable::delete_owned_link(db.pool(), playlist.id, song_id, user.id + 1)
            .await
            .unwrap());
        assert!(PlaylistTable::delete_owned_link(db.pool(), playlist.id, song_id, user.id)
            .await
            .unwrap());
        assert!(!PlaylistTable::delete_owned_link(db.pool(), playlist.id, song_id, user.id)
            .await
            .unwrap());
        assert!(PlaylistTable::get_owned(db.pool(), playlist.id, user.id + 1)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_owned_cascades_links() {
        let db = DbEngine::in_memory().await.unwrap();
        let (_, _, song_id) = seed(&db).await;
        let user = UserTable::insert(db.pool(), "u1", "u1@example.com", "x")
            .await
            .unwrap();
        let playlist = PlaylistTable::insert(db.pool(), user.id, "Mix", None)
            .await
            .unwrap();
        PlaylistTable::insert_link(db.pool(), playlist.id, song_id)
            .await
            .unwrap();

        assert!(!PlaylistTable::delete_owned(db.pool(), playlist.id, user.id + 1)
            .await
            .unwrap());
        assert!(PlaylistTable::delete_owned(db.pool(), playlist.id, user.id)
            .await
            .unwrap());
        assert_eq!(PlaylistTable::count_links(db.pool(), playlist.id).await.unwrap(), 0);
        assert!(!PlaylistTable::song_is_linked(db.pool(), song_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_writes_read_back_on_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tables.db").display());
        let db = DbEngine::connect(&url).await.unwrap();

        for i in 0..10 {
            let artist = ArtistTable::insert(
                db.pool(),
                &ArtistInput {
                    name: format!("Artist {}", i),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            assert_eq!(artist.name, format!("Artist {}", i));

            let renamed = ArtistTable::update(
                db.pool(),
                artist.id,
                &ArtistInput {
                    name: format!("Renamed {}", i),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
            assert_eq!(renamed.id, artist.id);
            assert_eq!(renamed.name, format!("Renamed {}", i));

            let fetched = ArtistTable::get_by_id(db.pool(), artist.id).await.unwrap().unwrap();
            assert_eq!(fetched.name, renamed.name);
        }

        let (_, _, song_id) = seed(&db).await;
        assert_eq!(SongTable::increment_plays(db.pool(), song_id).await.unwrap(), Some(1));
        assert!(SongTable::update(db.pool(), 999, &SongInput::default())
            .await
            .unwrap()
            .is_none());
    }
}
