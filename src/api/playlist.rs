use axum::{Extension, http::HeaderMap, response::Json};
use serde_json::{Value, json};

use crate::{Res, server::AppState};

use super::authed;

/// Ensures the user's playlist exists upstream and returns its id.
pub async fn create_playlist(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Res<Json<Value>> {
    let (user, token) = authed(&state, &headers).await?;
    let playlist_id = state.recorder.ensure_playlist(&token, &user.id).await?;
    Ok(Json(json!({ "status": "success", "playlist_id": playlist_id })))
}

/// Forgets the stored playlist reference. The playlist itself stays on
/// Spotify; the next like will create a fresh one.
pub async fn delete_playlist(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Res<Json<Value>> {
    let (user, _) = authed(&state, &headers).await?;
    state.users.clear_playlist_id(&user.id).await?;
    Ok(Json(json!({ "status": "success" })))
}
