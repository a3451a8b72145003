use serde::{Deserialize, Serialize};

/// OAuth token set as returned by the token endpoint, plus the time it was
/// obtained so expiry can be checked locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub obtained_at: u64,
}

impl Token {
    /// Whether the access token is past (or within 240 seconds of) expiry.
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp() as u64;
        now >= self.obtained_at + self.expires_in.saturating_sub(240)
    }
}

/// Denormalized profile snapshot kept in the session after login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

/// Track object as delivered by the recommendation and top-tracks endpoints.
/// Only the fields this service consumes are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    #[serde(default)]
    pub album: SpotifyAlbum,
}

impl SpotifyTrack {
    /// A track is only playable in the swipe UI when it carries preview media.
    pub fn has_preview(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

/// Outcome of a swipe, stored with the history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Dislike,
}

/// One entry of a user's append-only interaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub track_id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub action: SwipeAction,
}

/// Cached like/dislike counters; always equal to the per-action counts of
/// the `recommendations` history.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Swipes {
    pub likes: u64,
    pub dislikes: u64,
}

/// Persistent user record, keyed by the Spotify profile id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<Interaction>,
    #[serde(default)]
    pub swipes: Swipes,
}

impl User {
    pub fn new(id: String, name: String) -> Self {
        User {
            id,
            name,
            playlist_id: None,
            recommendations: Vec::new(),
            swipes: Swipes::default(),
        }
    }

    pub fn has_seen(&self, track_id: &str) -> bool {
        self.recommendations.iter().any(|r| r.track_id == track_id)
    }
}

/// Global per-track aggregate shared across users. A user id appears in at
/// most one of the two sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

/// Swipe payload posted by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeRequest {
    pub track_id: String,
    pub track_name: String,
    #[serde(default)]
    pub track_artists: Vec<String>,
    #[serde(default)]
    pub track_images: Vec<String>,
}
