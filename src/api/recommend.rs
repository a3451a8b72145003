use axum::{Extension, extract::Query, http::HeaderMap, response::Json};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Res, server::AppState};

use super::authed;

/// How many approved tracks a request yields when the caller does not ask
/// for a specific count. Matches the two-card swipe deck of the original
/// client.
const DEFAULT_LIMIT: usize = 2;

/// Upper bound per request; the upstream endpoint caps a single candidate
/// batch at this size anyway.
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<usize>,
    /// Explicit seed track id. Without it the user's recent top tracks
    /// seed the request.
    pub seed: Option<String>,
}

/// Returns a batch of approved recommendations: playable, novel for this
/// user, in upstream order. A short batch means the upstream ran out of
/// suitable candidates, not that the request failed.
pub async fn recommendations(
    Query(query): Query<RecommendationsQuery>,
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Res<Json<Value>> {
    let (user, token) = authed(&state, &headers).await?;

    let seeds = match query.seed {
        Some(seed) => vec![seed],
        None => state.engine.seed_from_top_tracks(&token).await?,
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let tracks = state
        .engine
        .get_recommendations(&token, &user.id, &seeds, limit)
        .await?;

    Ok(Json(json!({ "tracks": tracks })))
}
