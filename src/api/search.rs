//! Search routes

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use super::AppState;
use crate::core::SearchKind;
use crate::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search/{songs,artists,albums}?q=term
#[get("/{kind}")]
pub async fn search(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let kind: SearchKind = path.parse()?;
    let results = state.search.search(kind, &query.q).await?;
    Ok(HttpResponse::Ok().json(results))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(search);
}
