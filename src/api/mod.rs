//! # API Module
//!
//! HTTP endpoints served to the browser. Handlers stay thin: they resolve
//! the session from the cookie, delegate to the flows in
//! [`crate::management`], and translate failures at this boundary. The
//! authorization endpoints redirect back to the entry page with an
//! `#error=<marker>` fragment; the JSON endpoints answer with an error body
//! and a matching status code. Nothing below this layer writes a response.
//!
//! ## Endpoints
//!
//! - `GET /login` - begin the authorization flow, redirect to Spotify
//! - `GET /callback` - OAuth callback: state validation and token exchange
//! - `GET /logout` - destroy the session
//! - `GET /recommendations` - filtered recommendation batch
//! - `POST /like`, `POST /dislike` - record a swipe
//! - `GET /profile` - stored user document plus swipe statistics
//! - `GET /create-playlist`, `GET /delete-playlist` - playlist management
//! - `GET /search` - proxied catalog search
//! - `GET /health` - status and version

mod auth;
mod health;
mod playlist;
mod profile;
mod recommend;
mod search;
mod swipes;

pub use auth::callback;
pub use auth::login;
pub use auth::logout;
pub use health::health;
pub use playlist::create_playlist;
pub use playlist::delete_playlist;
pub use profile::profile;
pub use recommend::recommendations;
pub use search::search;
pub use swipes::dislike;
pub use swipes::like;

use axum::http::HeaderMap;

use crate::{
    Error, Res,
    server::AppState,
    types::{Token, UserProfile},
};

/// Name of the cookie correlating a browser with its server-side session.
pub const SESSION_COOKIE: &str = "juke_sid";

/// Extracts the session id from the request's cookie header, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Builds the Set-Cookie value binding the browser to `sid`.
pub fn session_cookie(sid: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, sid)
}

/// Resolves an authenticated session for a JSON endpoint: loads it by
/// cookie, obtains a usable token (refreshing if needed), and saves the
/// session back so a refreshed token sticks.
pub(crate) async fn authed(
    state: &AppState,
    headers: &HeaderMap,
) -> Res<(UserProfile, Token)> {
    let sid = session_id(headers).ok_or(Error::NotAuthenticated)?;
    let mut session = state.sessions.load(&sid).await;
    if !session.logged_in {
        return Err(Error::NotAuthenticated);
    }
    let token = state.flow.valid_token(&mut session).await?;
    let user = session.user.clone().ok_or(Error::NotAuthenticated)?;
    state.sessions.save(&sid, session).await?;
    Ok((user, token))
}
