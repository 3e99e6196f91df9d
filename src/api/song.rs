//! Song routes

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;

use super::auth::AuthUser;
use super::{path_id, AppState};
use crate::error::AppResult;
use crate::models::SongInput;
use crate::utils::validation::{optional_positive, optional_url, positive_id, required_text};

#[derive(Debug, Deserialize)]
pub struct SongBody {
    #[serde(default)]
    pub title: String,
    pub album_id: Option<i64>,
    pub artist_id: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub track_number: Option<i64>,
    pub file_url: Option<String>,
}

impl SongBody {
    pub(super) fn into_input(self) -> AppResult<SongInput> {
        Ok(SongInput {
            title: required_text(&self.title, "Song title is required")?,
            album_id: positive_id(
                self.album_id.unwrap_or(0),
                "Album ID must be a positive integer",
            )?,
            artist_id: positive_id(
                self.artist_id.unwrap_or(0),
                "Artist ID must be a positive integer",
            )?,
            duration_seconds: optional_positive(
                self.duration_seconds,
                "Duration must be a positive integer",
            )?,
            track_number: optional_positive(
                self.track_number,
                "Track number must be a positive integer",
            )?,
            file_url: optional_url(self.file_url.as_deref(), "File URL must be a valid URL")?,
        })
    }
}

/// GET /api/songs
#[get("")]
pub async fn list_songs(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.catalog.songs().await?))
}

/// POST /api/songs
#[post("")]
pub async fn create_song(
    state: web::Data<AppState>,
    _auth: AuthUser,
    body: web::Json<SongBody>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().into_input()?;
    let song = state.catalog.create_song(&input).await?;
    Ok(HttpResponse::Created().json(song))
}

/// GET /api/songs/{id}
#[get("/{id}")]
pub async fn get_song(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Song ID must be a positive integer")?;
    Ok(HttpResponse::Ok().json(state.catalog.song(id).await?))
}

/// PUT /api/songs/{id}
#[put("/{id}")]
pub async fn update_song(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
    body: web::Json<SongBody>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Song ID must be a positive integer")?;
    let input = body.into_inner().into_input()?;
    Ok(HttpResponse::Ok().json(state.catalog.update_song(id, &input).await?))
}

/// DELETE /api/songs/{id}
#[delete("/{id}")]
pub async fn delete_song(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Song ID must be a positive integer")?;
    let song = state.catalog.delete_song(id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "msg": "Song deleted successfully",
        "song": song,
    })))
}

/// GET /api/songs/{id}/playinfo
///
/// Counts a play every time it is fetched.
#[get("/{id}/playinfo")]
pub async fn play_info(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Song ID must be a positive integer")?;
    Ok(HttpResponse::Ok().json(state.catalog.play(id).await?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_songs)
        .service(create_song)
        .service(get_song)
        .service(update_song)
        .service(delete_song)
        .service(play_info);
}
