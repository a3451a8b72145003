//! # Spotify Integration Module
//!
//! Client layer for everything this service asks of Spotify: the OAuth 2.0
//! authorization-code exchange, profile and top-tracks lookups, the
//! recommendation endpoint, playlist creation and track adds, and catalog
//! search.
//!
//! ## Architecture
//!
//! ```text
//! Flows (management) and API handlers
//!          ↓  (via the Upstream trait)
//! SpotifyClient
//!     ├── auth   - authorization URL, code exchange, token refresh
//!     └── client - bearer-authenticated JSON calls per endpoint
//!          ↓
//! HTTP layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! Higher layers never talk to [`client::SpotifyClient`] directly; they hold
//! an `Arc<dyn Upstream>` so tests can substitute a scripted stub for the
//! real API.
//!
//! ## Error Handling
//!
//! Transport failures and non-JSON bodies surface as
//! [`Error::UpstreamUnavailable`](crate::Error::UpstreamUnavailable); a
//! token response without an access token surfaces as
//! [`Error::TokenExchangeFailed`](crate::Error::TokenExchangeFailed). The
//! client performs no retries of its own; retry policy belongs to callers.

pub mod auth;
pub mod client;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    Res,
    types::{CreatePlaylistResponse, SpotifyTrack, Token, UserProfile},
};

/// The upstream music service as consumed by the flows in `management`.
///
/// One implementor talks to the real Spotify Web API; tests inject stubs
/// with scripted responses.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Exchanges an authorization code for a token set.
    async fn exchange_code(&self, code: &str) -> Res<Token>;

    /// Exchanges a refresh token for a fresh token set.
    async fn refresh_token(&self, refresh_token: &str) -> Res<Token>;

    /// Fetches the profile of the token's owner.
    async fn profile(&self, token: &Token) -> Res<UserProfile>;

    /// Fetches the user's recent top tracks, used as recommendation seeds.
    async fn top_tracks(&self, token: &Token, limit: u32) -> Res<Vec<SpotifyTrack>>;

    /// Fetches up to `limit` candidate tracks seeded by `seed_tracks`.
    async fn recommendations(
        &self,
        token: &Token,
        seed_tracks: &[String],
        limit: u32,
    ) -> Res<Vec<SpotifyTrack>>;

    /// Creates a private playlist owned by `user_id`.
    async fn create_playlist(
        &self,
        token: &Token,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Res<CreatePlaylistResponse>;

    /// Appends one track to a playlist.
    async fn add_track_to_playlist(
        &self,
        token: &Token,
        playlist_id: &str,
        track_id: &str,
    ) -> Res<()>;

    /// Catalog search, passed through as raw JSON.
    async fn search(&self, token: &Token, query: &str) -> Res<Value>;
}
