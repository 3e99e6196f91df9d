//! REST API routes
//!
//! Everything is mounted under `/api`. Handlers return `AppResult`, so every
//! failure is rendered by `AppError` with a stable kind and status code.

pub mod album;
pub mod artist;
pub mod auth;
pub mod playlist;
pub mod search;
pub mod song;

use actix_web::{error, web, HttpRequest};

use crate::core::{CatalogStore, CredentialStore, PlaylistService, SearchService, TokenService};
use crate::db::DbEngine;
use crate::error::{AppError, AppResult};
use crate::utils::validation::positive_id;

/// Services shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub credentials: CredentialStore,
    pub catalog: CatalogStore,
    pub playlists: PlaylistService,
    pub search: SearchService,
}

impl AppState {
    pub fn new(db: DbEngine, tokens: TokenService) -> Self {
        Self {
            tokens,
            credentials: CredentialStore::new(db.clone()),
            catalog: CatalogStore::new(db.clone()),
            playlists: PlaylistService::new(db.clone()),
            search: SearchService::new(db),
        }
    }
}

/// Path ids are positive integers
pub(crate) fn path_id(id: i64, msg: &str) -> AppResult<i64> {
    positive_id(id, msg)
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

fn path_error(_err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation("Path ID must be a positive integer").into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid query string: {}", err)).into()
}

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/api")
                // Auth routes
                .service(web::scope("/auth").configure(auth::configure))
                // Catalog routes
                .service(web::scope("/artists").configure(artist::configure))
                .service(web::scope("/albums").configure(album::configure))
                .service(web::scope("/songs").configure(song::configure))
                // Playlist routes
                .service(web::scope("/playlists").configure(playlist::configure))
                // Search routes
                .service(web::scope("/search").configure(search::configure)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        app_with(DbEngine::in_memory().await.unwrap()).await
    }

    async fn app_with(
        db: DbEngine,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        let tokens = TokenService::new("test-secret", chrono::Duration::hours(1));
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(db, tokens)))
                .configure(configure),
        )
        .await
    }

    async fn call<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let resp = test::call_service(app, req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    async fn login<S>(app: &S, username: &str) -> String
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let email = format!("{}@example.com", username);
        let (status, _) = call(
            app,
            test::TestRequest::post().uri("/api/auth/register").set_json(json!({
                "username": username,
                "email": email,
                "password": "password123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            app,
            test::TestRequest::post().uri("/api/auth/login").set_json(json!({
                "email": email,
                "password": "password123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], username);
        body["token"].as_str().unwrap().to_string()
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    /// Creates an artist with one album; returns (artist_id, album_id)
    async fn seed_album<S>(app: &S, token: &str, name: &str) -> (i64, i64)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let (status, artist) = call(
            app,
            test::TestRequest::post()
                .uri("/api/artists")
                .insert_header(bearer(token))
                .set_json(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let artist_id = artist["id"].as_i64().unwrap();

        let (status, album) = call(
            app,
            test::TestRequest::post()
                .uri("/api/albums")
                .insert_header(bearer(token))
                .set_json(json!({ "title": format!("{} Album", name), "artist_id": artist_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        (artist_id, album["id"].as_i64().unwrap())
    }

    async fn seed_song<S>(app: &S, token: &str, title: &str, album_id: i64, artist_id: i64) -> i64
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let (status, song) = call(
            app,
            test::TestRequest::post()
                .uri("/api/songs")
                .insert_header(bearer(token))
                .set_json(json!({
                    "title": title,
                    "album_id": album_id,
                    "artist_id": artist_id,
                    "track_number": 1,
                })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        song["id"].as_i64().unwrap()
    }

    #[actix_web::test]
    async fn test_roadtrip_scenario() {
        let app = app().await;
        let token = login(&app, "u1").await;
        let (artist_id, album_id) = seed_album(&app, &token, "Band").await;
        let s1 = seed_song(&app, &token, "Highway", album_id, artist_id).await;

        let (status, playlist) = call(
            &app,
            test::TestRequest::post()
                .uri("/api/playlists")
                .insert_header(bearer(&token))
                .set_json(json!({ "name": "Roadtrip" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(playlist["name"], "Roadtrip");
        let pid = playlist["id"].as_i64().unwrap();

        let add = || {
            test::TestRequest::post()
                .uri(&format!("/api/playlists/{}/songs", pid))
                .insert_header(bearer(&token))
                .set_json(json!({ "songId": s1 }))
        };
        let (status, body) = call(&app, add()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["song_id"], s1);

        let (status, body) = call(&app, add()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["msg"], "Song already exists in this playlist.");
        assert_eq!(body["error"], "duplicate_song");

        let (status, _) = call(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/playlists/{}/songs/{}", pid, s1))
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, detail) = call(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/playlists/{}", pid))
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["songs"], json!([]));

        let (status, body) = call(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/playlists/{}", pid))
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["playlistId"], pid);
    }

    #[actix_web::test]
    async fn test_add_song_body_on_file_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("api.db").display());
        let app = app_with(DbEngine::connect(&url).await.unwrap()).await;
        let token = login(&app, "u1").await;
        let (artist_id, album_id) = seed_album(&app, &token, "Band").await;
        let s1 = seed_song(&app, &token, "Highway", album_id, artist_id).await;

        let (status, playlist) = call(
            &app,
            test::TestRequest::post()
                .uri("/api/playlists")
                .insert_header(bearer(&token))
                .set_json(json!({ "name": "Fresh" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let pid = playlist["id"].as_i64().unwrap();

        let add = |body: Value| {
            test::TestRequest::post()
                .uri(&format!("/api/playlists/{}/songs", pid))
                .insert_header(bearer(&token))
                .set_json(body)
        };

        let (status, body) = call(&app, add(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Song ID is required");

        let (status, body) = call(&app, add(json!({ "songId": 0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Song ID must be a positive integer");

        // the playlist created a moment ago is visible to the next request
        let (status, _) = call(&app, add(json!({ "songId": s1 }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, detail) = call(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/playlists/{}", pid))
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["songs"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_other_users_playlists_are_hidden() {
        let app = app().await;
        let owner = login(&app, "owner").await;
        let other = login(&app, "other").await;

        let (_, playlist) = call(
            &app,
            test::TestRequest::post()
                .uri("/api/playlists")
                .insert_header(bearer(&owner))
                .set_json(json!({ "name": "Private" })),
        )
        .await;
        let pid = playlist["id"].as_i64().unwrap();

        let (status, _) = call(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/playlists/{}", pid))
                .insert_header(bearer(&other)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/playlists/{}", pid))
                .insert_header(bearer(&other)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, list) = call(
            &app,
            test::TestRequest::get()
                .uri("/api/playlists")
                .insert_header(bearer(&other)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));
    }

    #[actix_web::test]
    async fn test_token_required() {
        let app = app().await;

        let (status, body) = call(&app, test::TestRequest::get().uri("/api/playlists")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "No token, authorization denied");

        let (status, body) = call(
            &app,
            test::TestRequest::get()
                .uri("/api/playlists")
                .insert_header(("Authorization", "Bearer garbage")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthenticated");

        let (status, _) = call(
            &app,
            test::TestRequest::post()
                .uri("/api/artists")
                .set_json(json!({ "name": "Nobody" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_auth_failures() {
        let app = app().await;
        let token = login(&app, "u1").await;

        let (status, body) = call(
            &app,
            test::TestRequest::post().uri("/api/auth/register").set_json(json!({
                "username": "u2",
                "email": "U1@example.com",
                "password": "password123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "duplicate_email");

        let (status, body) = call(
            &app,
            test::TestRequest::post().uri("/api/auth/login").set_json(json!({
                "email": "u1@example.com",
                "password": "wrong-password",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "Invalid credentials");

        let (status, body) = call(
            &app,
            test::TestRequest::post().uri("/api/auth/register").set_json(json!({
                "username": "u3",
                "email": "not-an-email",
                "password": "password123",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let (status, me) = call(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "u1@example.com");
        assert!(me.get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_song_artist_mismatch_is_bad_request() {
        let app = app().await;
        let token = login(&app, "u1").await;
        let (_, album_id) = seed_album(&app, &token, "First").await;
        let (other_artist, _) = seed_album(&app, &token, "Second").await;

        let (status, body) = call(
            &app,
            test::TestRequest::post()
                .uri("/api/songs")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "title": "Stray",
                    "album_id": album_id,
                    "artist_id": other_artist,
                })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["msg"]
            .as_str()
            .unwrap()
            .contains("does not match the album's artist ID"));
    }

    #[actix_web::test]
    async fn test_catalog_conflicts_and_playinfo() {
        let app = app().await;
        let token = login(&app, "u1").await;
        let (artist_id, album_id) = seed_album(&app, &token, "Band").await;

        let (status, body) = call(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/albums/{}/songs", album_id))
                .insert_header(bearer(&token))
                .set_json(json!({ "title": "Nested", "artist_id": artist_id, "album_id": album_id + 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["msg"].as_str().unwrap().contains("conflicts with URL parameter"));

        let (status, song) = call(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/albums/{}/songs", album_id))
                .insert_header(bearer(&token))
                .set_json(json!({ "title": "Nested", "artist_id": artist_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let song_id = song["id"].as_i64().unwrap();

        let (status, body) = call(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/artists/{}", artist_id))
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");

        let (status, info) = call(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/songs/{}/playinfo", song_id))
                .insert_header(bearer(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(info["songId"], song_id);
        assert_eq!(info["artistName"], "Band");
        assert_eq!(info["plays"], 1);

        let (status, songs) = call(
            &app,
            test::TestRequest::get().uri(&format!("/api/albums/{}/songs", album_id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(songs[0]["plays"], 1);

        let (status, body) = call(&app, test::TestRequest::get().uri("/api/songs/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[actix_web::test]
    async fn test_search_outcomes() {
        let app = app().await;
        let token = login(&app, "u1").await;
        let (artist_id, album_id) = seed_album(&app, &token, "Band").await;
        seed_song(&app, &token, "Morning Light", album_id, artist_id).await;

        let (status, body) = call(&app, test::TestRequest::get().uri("/api/search/songs?q=")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_query");

        let (status, body) =
            call(&app, test::TestRequest::get().uri("/api/search/songs?q=evening")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["results"], json!([]));

        let (status, body) =
            call(&app, test::TestRequest::get().uri("/api/search/songs?q=LIGHT")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["title"], "Morning Light");
        assert_eq!(body[0]["artist"]["name"], "Band");
    }
}
