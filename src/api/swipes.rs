use axum::{Extension, http::HeaderMap, response::Json};
use serde_json::{Value, json};

use crate::{
    Res,
    server::AppState,
    types::{Interaction, SwipeAction, SwipeRequest},
};

use super::authed;

pub async fn like(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(request): Json<SwipeRequest>,
) -> Res<Json<Value>> {
    swipe(state, headers, request, SwipeAction::Like).await
}

pub async fn dislike(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(request): Json<SwipeRequest>,
) -> Res<Json<Value>> {
    swipe(state, headers, request, SwipeAction::Dislike).await
}

/// Shared handler for both swipe directions. A duplicate submission still
/// answers success so a double-posted browser action stays harmless.
async fn swipe(
    state: AppState,
    headers: HeaderMap,
    request: SwipeRequest,
    action: SwipeAction,
) -> Res<Json<Value>> {
    let (user, token) = authed(&state, &headers).await?;

    let entry = Interaction {
        track_id: request.track_id,
        name: request.track_name,
        artists: request.track_artists,
        images: request.track_images,
        action,
    };
    state.recorder.record(&token, &user.id, entry).await?;

    Ok(Json(json!({ "status": "success" })))
}
