use axum::{Extension, extract::Query, http::HeaderMap, response::Json};
use serde::Deserialize;
use serde_json::Value;

use crate::{Res, server::AppState};

use super::authed;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Proxied catalog search across tracks, artists and albums. The upstream
/// response is passed through untouched.
pub async fn search(
    Query(query): Query<SearchQuery>,
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Res<Json<Value>> {
    let (_, token) = authed(&state, &headers).await?;
    let results = state.upstream.search(&token, &query.q).await?;
    Ok(Json(results))
}
