//! Album routes, including the songs nested under an album

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;

use super::auth::AuthUser;
use super::song::SongBody;
use super::{path_id, AppState};
use crate::error::{AppError, AppResult};
use crate::models::AlbumInput;
use crate::utils::validation::{optional_date, optional_text, optional_url, positive_id, required_text};

#[derive(Debug, Deserialize)]
pub struct AlbumBody {
    #[serde(default)]
    pub title: String,
    pub artist_id: Option<i64>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub cover_image_url: Option<String>,
}

impl AlbumBody {
    fn into_input(self) -> AppResult<AlbumInput> {
        Ok(AlbumInput {
            title: required_text(&self.title, "Album title is required")?,
            artist_id: positive_id(
                self.artist_id.unwrap_or(0),
                "Artist ID must be a positive integer",
            )?,
            release_date: optional_date(
                self.release_date.as_deref(),
                "Release date must be a valid date (YYYY-MM-DD)",
            )?,
            genre: optional_text(self.genre.as_deref()),
            cover_image_url: optional_url(
                self.cover_image_url.as_deref(),
                "Cover image URL must be a valid URL",
            )?,
        })
    }
}

/// GET /api/albums
#[get("")]
pub async fn list_albums(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.catalog.albums().await?))
}

/// POST /api/albums
#[post("")]
pub async fn create_album(
    state: web::Data<AppState>,
    _auth: AuthUser,
    body: web::Json<AlbumBody>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().into_input()?;
    let album = state.catalog.create_album(&input).await?;
    Ok(HttpResponse::Created().json(album))
}

/// GET /api/albums/{id}
#[get("/{id}")]
pub async fn get_album(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Album ID must be a positive integer")?;
    Ok(HttpResponse::Ok().json(state.catalog.album(id).await?))
}

/// PUT /api/albums/{id}
#[put("/{id}")]
pub async fn update_album(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
    body: web::Json<AlbumBody>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Album ID must be a positive integer")?;
    let input = body.into_inner().into_input()?;
    Ok(HttpResponse::Ok().json(state.catalog.update_album(id, &input).await?))
}

/// DELETE /api/albums/{id}
#[delete("/{id}")]
pub async fn delete_album(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Album ID must be a positive integer")?;
    let album = state.catalog.delete_album(id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "msg": "Album deleted successfully",
        "album": album,
    })))
}

/// GET /api/albums/{id}/songs
#[get("/{id}/songs")]
pub async fn album_songs(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Album ID must be a positive integer")?;
    Ok(HttpResponse::Ok().json(state.catalog.album_songs(id).await?))
}

/// POST /api/albums/{id}/songs
#[post("/{id}/songs")]
pub async fn create_album_song(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
    body: web::Json<SongBody>,
) -> AppResult<HttpResponse> {
    let album_id = path_id(path.into_inner(), "Album ID must be a positive integer")?;
    let mut body = body.into_inner();

    match body.album_id {
        Some(given) if given != album_id => {
            return Err(AppError::validation(format!(
                "album_id in body ({}) conflicts with URL parameter ({})",
                given, album_id
            )));
        }
        _ => body.album_id = Some(album_id),
    }

    let song = state.catalog.create_song(&body.into_input()?).await?;
    Ok(HttpResponse::Created().json(song))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_albums)
        .service(create_album)
        .service(get_album)
        .service(update_album)
        .service(delete_album)
        .service(album_songs)
        .service(create_album_song);
}
