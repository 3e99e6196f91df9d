//! Playlist routes; every route acts for the authenticated owner

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;

use super::auth::AuthUser;
use super::{path_id, AppState};
use crate::error::{AppError, AppResult};
use crate::utils::validation::positive_id;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistBody {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSongBody {
    #[serde(rename = "songId", alias = "song_id")]
    pub song_id: Option<i64>,
}

/// POST /api/playlists
#[post("")]
pub async fn create_playlist(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<CreatePlaylistBody>,
) -> AppResult<HttpResponse> {
    let playlist = state
        .playlists
        .create(auth.0.id, &body.name, body.description.as_deref())
        .await?;

    Ok(HttpResponse::Created().json(playlist))
}

/// GET /api/playlists
#[get("")]
pub async fn list_playlists(state: web::Data<AppState>, auth: AuthUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.playlists.list_for_owner(auth.0.id).await?))
}

/// GET /api/playlists/{id}
#[get("/{id}")]
pub async fn get_playlist(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Playlist ID must be a positive integer")?;
    Ok(HttpResponse::Ok().json(state.playlists.get_detail(id, auth.0.id).await?))
}

/// DELETE /api/playlists/{id}
#[delete("/{id}")]
pub async fn delete_playlist(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Playlist ID must be a positive integer")?;
    let deleted = state.playlists.delete(id, auth.0.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "msg": "Playlist deleted successfully.",
        "playlistId": deleted,
    })))
}

/// POST /api/playlists/{id}/songs
#[post("/{id}/songs")]
pub async fn add_song(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i64>,
    body: web::Json<AddSongBody>,
) -> AppResult<HttpResponse> {
    let id = path_id(path.into_inner(), "Playlist ID must be a positive integer")?;
    let song_id = match body.song_id {
        Some(song_id) => positive_id(song_id, "Song ID must be a positive integer")?,
        None => return Err(AppError::validation("Song ID is required")),
    };

    let link = state.playlists.add_song(id, song_id, auth.0.id).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "msg": "Song added to playlist successfully",
        "data": link,
    })))
}

/// DELETE /api/playlists/{id}/songs/{song_id}
#[delete("/{id}/songs/{song_id}")]
pub async fn remove_song(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (id, song_id) = path.into_inner();
    let id = path_id(id, "Playlist ID must be a positive integer")?;
    let song_id = path_id(song_id, "Song ID must be a positive integer")?;

    state.playlists.remove_song(id, song_id, auth.0.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "msg": "Song removed from playlist successfully.",
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_playlist)
        .service(list_playlists)
        .service(get_playlist)
        .service(delete_playlist)
        .service(add_song)
        .service(remove_song);
}
