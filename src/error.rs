//! Error taxonomy shared by the services and the HTTP layer
//!
//! Every failure a caller can observe maps to one `AppError` variant with a
//! stable machine-readable kind. Storage failures that do not match a typed
//! case stay opaque to the client and are logged in full on the server.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result alias used by the services
pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("Token is not valid (expired)")]
    Expired,

    #[error("Token is not valid (invalid signature)")]
    InvalidSignature,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// A well-formed search that matched nothing
    #[error("{0}")]
    NoMatches(String),

    #[error("Song already exists in this playlist.")]
    DuplicateSong,

    #[error(
        "The artist ID ({song_artist}) for the song does not match the album's artist ID ({album_artist})."
    )]
    ArtistAlbumMismatch { song_artist: i64, album_artist: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::Expired => "expired",
            AppError::InvalidSignature => "invalid_signature",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::DuplicateEmail => "duplicate_email",
            AppError::DuplicateUsername => "duplicate_username",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) | AppError::NoMatches(_) => "not_found",
            AppError::DuplicateSong => "duplicate_song",
            AppError::ArtistAlbumMismatch { .. } => "artist_album_mismatch",
            AppError::Conflict(_) => "conflict",
            AppError::InvalidQuery(_) => "invalid_query",
            AppError::Validation(_) => "validation_error",
            AppError::Database(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    fn is_internal(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_)
            | AppError::Expired
            | AppError::InvalidSignature
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::NoMatches(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateSong | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DuplicateEmail
            | AppError::DuplicateUsername
            | AppError::ArtistAlbumMismatch { .. }
            | AppError::InvalidQuery(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            tracing::error!(error = ?self, "request failed");
            return HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": self.kind(),
                "msg": "Internal server error",
            }));
        }

        let mut body = serde_json::json!({
            "error": self.kind(),
            "msg": self.to_string(),
        });
        if let AppError::NoMatches(_) = self {
            body["results"] = serde_json::json!([]);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// True when the database rejected a write on a UNIQUE constraint
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

/// True when the database rejected a write on a FOREIGN KEY constraint
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::DuplicateSong.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Expired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::ArtistAlbumMismatch {
                song_artist: 1,
                album_artist: 2
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_mismatch_message() {
        let err = AppError::ArtistAlbumMismatch {
            song_artist: 3,
            album_artist: 7,
        };
        assert!(err
            .to_string()
            .contains("does not match the album's artist ID (7)"));
    }

    #[actix_web::test]
    async fn test_internal_errors_are_opaque() {
        let err = AppError::Internal(anyhow::anyhow!("disk on fire at /var/lib/db"));
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("disk on fire"));
        assert!(text.contains("internal"));
    }

    #[actix_web::test]
    async fn test_no_matches_carries_empty_results() {
        let resp = AppError::NoMatches("nothing".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["results"], serde_json::json!([]));
        assert_eq!(value["error"], "not_found");
    }
}
