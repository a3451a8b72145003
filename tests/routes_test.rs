mod common;

use std::{
    collections::HashMap,
    sync::{Arc, atomic::Ordering},
};

use axum::{
    Extension,
    extract::Query,
    http::{
        HeaderMap, HeaderValue,
        header::{LOCATION, SET_COOKIE},
    },
    response::IntoResponse,
};

use juke::{
    api,
    management::{
        AuthFlow, InteractionRecorder, JsonTrackStore, JsonUserStore, RecommendationEngine,
    },
    server::AppState,
    session::{MemorySessionStore, Session},
};

use common::{StubUpstream, temp_store_path};

async fn app_state() -> (AppState, Arc<StubUpstream>) {
    let users = Arc::new(
        JsonUserStore::open(temp_store_path("users.json"))
            .await
            .expect("open user store"),
    );
    let tracks = Arc::new(
        JsonTrackStore::open(temp_store_path("songs.json"))
            .await
            .expect("open track store"),
    );
    let upstream = Arc::new(StubUpstream::new());
    let state = AppState {
        sessions: Arc::new(MemorySessionStore::new()),
        users: users.clone(),
        upstream: upstream.clone(),
        flow: Arc::new(AuthFlow::new(users.clone(), upstream.clone())),
        engine: Arc::new(RecommendationEngine::new(users.clone(), upstream.clone())),
        recorder: Arc::new(InteractionRecorder::new(users, tracks, upstream.clone())),
    };
    (state, upstream)
}

fn cookie_headers(sid: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "cookie",
        HeaderValue::from_str(&format!("{}={}", api::SESSION_COOKIE, sid)).unwrap(),
    );
    headers
}

fn callback_params(code: Option<&str>, state: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(code) = code {
        params.insert("code".to_string(), code.to_string());
    }
    if let Some(state) = state {
        params.insert("state".to_string(), state.to_string());
    }
    params
}

async fn seed_session(state: &AppState, sid: &str, nonce: &str) {
    let mut session = Session::default();
    session.state = Some(nonce.to_string());
    state.sessions.save(sid, session).await.expect("save session");
}

/// The authorization endpoint configuration read by the login handler.
/// Every caller sets the same values, so parallel tests cannot disagree.
fn set_auth_env() {
    unsafe {
        std::env::set_var("SPOTIFY_API_AUTH_URL", "https://accounts.spotify.test/authorize");
        std::env::set_var("SPOTIFY_API_AUTH_CLIENT_ID", "client-id");
        std::env::set_var("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:3000/callback");
    }
}

#[tokio::test]
async fn login_sets_the_session_cookie_and_redirects_to_authorization() {
    set_auth_env();
    let (state, _upstream) = app_state().await;

    let response = api::login(Extension(state.clone()), HeaderMap::new()).await;

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(&format!("{}=", api::SESSION_COOKIE)));
    assert!(cookie.contains("HttpOnly"));

    let location = response
        .headers()
        .get(LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("https://accounts.spotify.test/authorize?response_type=code"));

    // The state carried by the redirect is the nonce stored in the session
    // the cookie names.
    let sid = cookie
        .split(';')
        .next()
        .unwrap()
        .trim_start_matches(&format!("{}=", api::SESSION_COOKIE))
        .to_string();
    let session = state.sessions.load(&sid).await;
    let nonce = session.state.expect("stored nonce");
    assert!(location.ends_with(&format!("state={}", nonce)));
}

#[tokio::test]
async fn mismatched_callback_redirects_with_the_state_marker() {
    let (state, upstream) = app_state().await;
    seed_session(&state, "sid-1", "expected-nonce").await;

    let redirect = api::callback(
        Query(callback_params(Some("code-1"), Some("other-nonce"))),
        Extension(state.clone()),
        cookie_headers("sid-1"),
    )
    .await;

    let response = redirect.into_response();
    assert_eq!(
        response.headers().get(LOCATION).expect("location"),
        "/#error=state_mismatch"
    );
    assert_eq!(upstream.exchange_calls.load(Ordering::SeqCst), 0);
    // The consumed nonce is saved back, so a replay cannot match either.
    assert!(state.sessions.load("sid-1").await.state.is_none());
}

#[tokio::test]
async fn callback_without_a_code_redirects_with_the_token_marker() {
    let (state, _upstream) = app_state().await;
    seed_session(&state, "sid-1", "nonce-1").await;

    let redirect = api::callback(
        Query(callback_params(None, Some("nonce-1"))),
        Extension(state.clone()),
        cookie_headers("sid-1"),
    )
    .await;

    let response = redirect.into_response();
    assert_eq!(
        response.headers().get(LOCATION).expect("location"),
        "/#error=token_request_failed"
    );
}

#[tokio::test]
async fn callback_without_a_session_cookie_redirects_with_the_state_marker() {
    let (state, upstream) = app_state().await;

    let redirect = api::callback(
        Query(callback_params(Some("code-1"), Some("nonce-1"))),
        Extension(state),
        HeaderMap::new(),
    )
    .await;

    let response = redirect.into_response();
    assert_eq!(
        response.headers().get(LOCATION).expect("location"),
        "/#error=state_mismatch"
    );
    assert_eq!(upstream.exchange_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_callback_redirects_home_and_saves_the_session() {
    let (state, upstream) = app_state().await;
    upstream.set_profile("spotify-user-1", "Someone");
    seed_session(&state, "sid-1", "nonce-1").await;

    let redirect = api::callback(
        Query(callback_params(Some("code-1"), Some("nonce-1"))),
        Extension(state.clone()),
        cookie_headers("sid-1"),
    )
    .await;

    let response = redirect.into_response();
    assert_eq!(response.headers().get(LOCATION).expect("location"), "/");

    let session = state.sessions.load("sid-1").await;
    assert!(session.logged_in);
    assert_eq!(
        session.token().map(|t| t.access_token.as_str()),
        Some("granted-code-1")
    );
}

#[tokio::test]
async fn health_reports_service_and_version() {
    let body = api::health().await.0;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
