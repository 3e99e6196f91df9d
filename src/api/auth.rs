//! Authentication routes and the bearer-token extractor

use actix_web::dev::Payload;
use actix_web::{get, post, web, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::Deserialize;

use super::AppState;
use crate::core::Identity;
use crate::error::{AppError, AppResult};
use crate::utils::validation::{normalize_email, required_text};

const MIN_PASSWORD_LEN: usize = 6;

/// Identity of the caller, taken from a verified `Authorization: Bearer` token
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}

fn authenticate_request(req: &HttpRequest) -> AppResult<AuthUser> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("application state not configured")))?;

    let token = bearer_token(req).ok_or_else(|| {
        AppError::Unauthenticated("No token, authorization denied".to_string())
    })?;

    state.tokens.verify(token).map(AuthUser)
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get("Authorization")?.to_str().ok()?.trim();
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let username = required_text(&body.username, "Username is required")?;
    let email = normalize_email(&body.email)
        .ok_or_else(|| AppError::validation("Please include a valid email"))?;
    if body.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be {} or more characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = state
        .credentials
        .register(&username, &email, &body.password)
        .await?;

    Ok(HttpResponse::Created().json(user))
}

/// POST /api/auth/login
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let email = normalize_email(&body.email)
        .ok_or_else(|| AppError::validation("Please include a valid email"))?;
    if body.password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let user = state.credentials.authenticate(&email, &body.password).await?;
    let token = state.tokens.issue(&Identity::from(&user))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "user": user,
    })))
}

/// GET /api/auth/me
#[get("/me")]
pub async fn me(state: web::Data<AppState>, auth: AuthUser) -> AppResult<HttpResponse> {
    let user = state.credentials.get(auth.0.id).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(me);
}
