use axum::{Extension, http::HeaderMap, response::Json};
use serde_json::{Value, json};

use crate::{Error, Res, server::AppState};

use super::authed;

/// Returns the stored user document: history (most recent first) and
/// aggregate swipe statistics.
pub async fn profile(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Res<Json<Value>> {
    let (user, _) = authed(&state, &headers).await?;

    let record = state
        .users
        .find(&user.id)
        .await?
        .ok_or_else(|| Error::UnknownUser(user.id.clone()))?;

    let mut recommendations = record.recommendations.clone();
    recommendations.reverse();

    Ok(Json(json!({
        "user": {
            "id": record.id,
            "name": record.name,
            "playlist_id": record.playlist_id,
        },
        "recommendations": recommendations,
        "stats": {
            "total_swipes": record.recommendations.len(),
            "likes": record.swipes.likes,
            "dislikes": record.swipes.dislikes,
        }
    })))
}
