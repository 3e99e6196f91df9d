//! Artist routes

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;

use super::auth::AuthUser;
use super::{path_id, AppState};
use crate::error::AppResult;
use crate::models::ArtistInput;
use crate::utils::validation::{optional_text, optional_url, required_text};

#[derive(Debug, Deserialize)]
pub struct ArtistBody {
    #[serde(default)]
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

impl ArtistBody {
    fn into_input(self) -> AppResult<ArtistInput> {
        Ok(ArtistInput {
            name: required_text(&self.name, "Artist name is required")?,
            bio: optional_text(self.bio.as_deref()),
            image_url: optional_url(self.image_url.as_deref(), "Image URL must be a valid URL")?,
        })
    }
}

/// GET /api/artists
#[get("")]
pub async fn list_artists(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.catalog.artists().await?))
}

/// POST /api/artists
#[post("")]
pub async fn create_artist(
    state: web::Data<AppState>,
    _auth: AuthUser,
    body: web::Json<ArtistBody>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().into_input()?;
    let artist = state.catalog.create_artist(&input).await?;
    Ok(HttpResponse::Created().json(artist))
}

/// GET /api/artists/{id}
#[get("/{id}")]
pub async fn get_artist(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Artist ID must be a positive integer")?;
    Ok(HttpResponse::Ok().json(state.catalog.artist(id).await?))
}

/// PUT /api/artists/{id}
#[put("/{id}")]
pub async fn update_artist(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
    body: web::Json<ArtistBody>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Artist ID must be a positive integer")?;
    let input = body.into_inner().into_input()?;
    Ok(HttpResponse::Ok().json(state.catalog.update_artist(id, &input).await?))
}

/// DELETE /api/artists/{id}
#[delete("/{id}")]
pub async fn delete_artist(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Artist ID must be a positive integer")?;
    let artist = state.catalog.delete_artist(id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "msg": "Artist deleted successfully",
        "artist": artist,
    })))
}

/// GET /api/artists/{id}/albums
#[get("/{id}/albums")]
pub async fn artist_albums(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Artist ID must be a positive integer")?;
    Ok(HttpResponse::Ok().json(state.catalog.artist_albums(id).await?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_artists)
        .service(create_artist)
        .service(get_artist)
        .service(update_artist)
        .service(delete_artist)
        .service(artist_albums);
}
