use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::{
    api, config, error,
    management::{AuthFlow, InteractionRecorder, RecommendationEngine, UserStore},
    session::SessionStore,
    spotify::Upstream,
};

/// Shared handler state: the collaborators are constructed once at startup
/// and handed to every request through an axum extension.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserStore>,
    pub upstream: Arc<dyn Upstream>,
    pub flow: Arc<AuthFlow>,
    pub engine: Arc<RecommendationEngine>,
    pub recorder: Arc<InteractionRecorder>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/logout", get(api::logout))
        .route("/recommendations", get(api::recommendations))
        .route("/like", post(api::like))
        .route("/dislike", post(api::dislike))
        .route("/profile", get(api::profile))
        .route("/create-playlist", get(api::create_playlist))
        .route("/delete-playlist", get(api::delete_playlist))
        .route("/search", get(api::search))
        .layer(Extension(state))
}

pub async fn start_api_server(state: AppState, address: Option<String>) {
    let app = router(state);

    let address = address.unwrap_or_else(config::server_addr);
    let addr = match SocketAddr::from_str(&address) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
