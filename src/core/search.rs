//! Substring search over the catalog

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::db::{AlbumTable, ArtistTable, DbEngine, SongTable};
use crate::error::{AppError, AppResult};
use crate::models::{AlbumWithArtist, Artist, SongDetail};

/// What a search runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Songs,
    Artists,
    Albums,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Songs => "songs",
            SearchKind::Artists => "artists",
            SearchKind::Albums => "albums",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "songs" => Ok(SearchKind::Songs),
            "artists" => Ok(SearchKind::Artists),
            "albums" => Ok(SearchKind::Albums),
            other => Err(AppError::not_found(format!("Unknown search type '{}'", other))),
        }
    }
}

/// Matches of one search, tagged by kind
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Songs(Vec<SongDetail>),
    Artists(Vec<Artist>),
    Albums(Vec<AlbumWithArtist>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Songs(v) => v.len(),
            SearchResults::Artists(v) => v.len(),
            SearchResults::Albums(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct SearchService {
    db: DbEngine,
}

impl SearchService {
    pub fn new(db: DbEngine) -> Self {
        Self { db }
    }

    /// Case-insensitive substring match on song title, artist name or album title
    ///
    /// A blank term is `InvalidQuery`; no matches is `NoMatches`, which
    /// callers must keep apart from an empty success.
    pub async fn search(&self, kind: SearchKind, term: &str) -> AppResult<SearchResults> {
        let term = term.trim();
        if term.is_empty() {
            return Err(AppError::InvalidQuery(
                "Search query (q) is required and must be a non-empty string.".to_string(),
            ));
        }

        let pool = self.db.pool();
        let results = match kind {
            SearchKind::Songs => SearchResults::Songs(SongTable::search_by_title(pool, term).await?),
            SearchKind::Artists => {
                SearchResults::Artists(ArtistTable::search_by_name(pool, term).await?)
            }
            SearchKind::Albums => {
                SearchResults::Albums(AlbumTable::search_by_title(pool, term).await?)
            }
        };

        if results.is_empty() {
            return Err(AppError::NoMatches(format!(
                "No {} found matching \"{}\".",
                kind, term
            )));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlbumInput, ArtistInput};

    async fn service() -> SearchService {
        let db = DbEngine::in_memory().await.unwrap();
        let artist = ArtistTable::insert(
            db.pool(),
            &ArtistInput {
                name: "Miles Davis".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        AlbumTable::insert(
            db.pool(),
            &AlbumInput {
                title: "Kind of Blue".into(),
                artist_id: artist.id,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        SearchService::new(db)
    }

    #[tokio::test]
    async fn test_blank_term_is_invalid() {
        let search = service().await;
        assert!(matches!(
            search.search(SearchKind::Songs, "   ").await,
            Err(AppError::InvalidQuery(_))
        ));
    }

    #[tokio::test]
    async fn test_no_matches_is_distinct_from_empty_success() {
        let search = service().await;
        let err = search
            .search(SearchKind::Artists, "coltrane")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoMatches(_)));
        assert_eq!(err.to_string(), "No artists found matching \"coltrane\".");
    }

    #[tokio::test]
    async fn test_case_insensitive_substring() {
        let search = service().await;

        match search.search(SearchKind::Artists, "DAVIS").await.unwrap() {
            SearchResults::Artists(artists) => assert_eq!(artists[0].name, "Miles Davis"),
            other => panic!("unexpected results {:?}", other),
        }
        match search.search(SearchKind::Albums, "of bl").await.unwrap() {
            SearchResults::Albums(albums) => assert_eq!(albums[0].artist.name, "Miles Davis"),
            other => panic!("unexpected results {:?}", other),
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("albums".parse::<SearchKind>().unwrap(), SearchKind::Albums);
        assert!("tracks".parse::<SearchKind>().is_err());
    }
}
