use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};

use crate::{server::AppState, session, warning};

use super::{session_cookie, session_id};

/// Starts the authorization flow: stores the anti-forgery nonce in the
/// session and sends the browser to Spotify's consent page.
pub async fn login(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    let sid = session_id(&headers).unwrap_or_else(session::new_session_id);
    let mut session = state.sessions.load(&sid).await;

    let auth_url = state.flow.begin_authorization(&mut session);

    if let Err(e) = state.sessions.save(&sid, session).await {
        warning!("Session save failed during login: {}", e);
        return Redirect::to(&format!("/#error={}", e.marker())).into_response();
    }

    ([(SET_COOKIE, session_cookie(&sid))], Redirect::to(&auth_url)).into_response()
}

/// Handles the redirect back from Spotify.
///
/// All failures land the browser back at the entry page with an error
/// marker in the fragment; this handler never surfaces a raw error to the
/// user. The session is saved even on failure so the consumed state nonce
/// cannot be replayed.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Redirect {
    let Some(sid) = session_id(&headers) else {
        return Redirect::to("/#error=state_mismatch");
    };
    let mut session = state.sessions.load(&sid).await;

    let result = state
        .flow
        .handle_callback(
            &mut session,
            params.get("code").map(String::as_str),
            params.get("state").map(String::as_str),
        )
        .await;

    match result {
        Ok(()) => match state.sessions.save(&sid, session).await {
            Ok(()) => Redirect::to("/"),
            Err(e) => {
                warning!("Session save failed after callback: {}", e);
                Redirect::to(&format!("/#error={}", e.marker()))
            }
        },
        Err(e) => {
            warning!("Authorization callback failed: {}", e);
            if let Err(save_err) = state.sessions.save(&sid, session).await {
                warning!("Session save failed after callback error: {}", save_err);
            }
            Redirect::to(&format!("/#error={}", e.marker()))
        }
    }
}

/// Destroys the session. Idempotent: logging out twice is not an error.
pub async fn logout(Extension(state): Extension<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(sid) = session_id(&headers) {
        state.sessions.destroy(&sid).await;
    }
    Redirect::to("/")
}
