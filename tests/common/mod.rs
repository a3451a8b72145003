#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::{Value, json};

use juke::{
    Error, Res,
    spotify::Upstream,
    types::{
        CreatePlaylistResponse, Interaction, SpotifyAlbum, SpotifyArtist, SpotifyTrack,
        SwipeAction, Token, UserProfile,
    },
    utils,
};

/// Scripted stand-in for the Spotify API.
///
/// Recommendation requests consume queued batches front-first; once the
/// queue is empty every further request answers with the fallback batch,
/// mimicking an upstream whose candidate pool for a seed set is exhausted.
pub struct StubUpstream {
    batches: Mutex<VecDeque<Vec<SpotifyTrack>>>,
    fallback: Mutex<Vec<SpotifyTrack>>,
    top: Mutex<Vec<SpotifyTrack>>,
    profile: Mutex<UserProfile>,
    pub exchange_calls: AtomicUsize,
    pub recommendation_calls: AtomicUsize,
    pub playlist_creates: AtomicUsize,
    pub playlist_adds: Mutex<Vec<(String, String)>>,
    /// Number of upcoming add-track calls that should fail.
    pub add_failures: AtomicUsize,
}

impl StubUpstream {
    pub fn new() -> Self {
        StubUpstream {
            batches: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Vec::new()),
            top: Mutex::new(Vec::new()),
            profile: Mutex::new(UserProfile {
                id: "test-user".to_string(),
                display_name: Some("Test User".to_string()),
            }),
            exchange_calls: AtomicUsize::new(0),
            recommendation_calls: AtomicUsize::new(0),
            playlist_creates: AtomicUsize::new(0),
            playlist_adds: Mutex::new(Vec::new()),
            add_failures: AtomicUsize::new(0),
        }
    }

    pub fn queue_batch(&self, batch: Vec<SpotifyTrack>) {
        self.batches.lock().unwrap().push_back(batch);
    }

    pub fn set_fallback(&self, batch: Vec<SpotifyTrack>) {
        *self.fallback.lock().unwrap() = batch;
    }

    pub fn set_top_tracks(&self, tracks: Vec<SpotifyTrack>) {
        *self.top.lock().unwrap() = tracks;
    }

    pub fn set_profile(&self, id: &str, display_name: &str) {
        *self.profile.lock().unwrap() = UserProfile {
            id: id.to_string(),
            display_name: Some(display_name.to_string()),
        };
    }

    pub fn recommendation_call_count(&self) -> usize {
        self.recommendation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn exchange_code(&self, code: &str) -> Res<Token> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        Ok(token_with_access(&format!("granted-{}", code)))
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Res<Token> {
        let mut token = token_with_access("refreshed");
        token.refresh_token = None;
        Ok(token)
    }

    async fn profile(&self, _token: &Token) -> Res<UserProfile> {
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn top_tracks(&self, _token: &Token, _limit: u32) -> Res<Vec<SpotifyTrack>> {
        Ok(self.top.lock().unwrap().clone())
    }

    async fn recommendations(
        &self,
        _token: &Token,
        _seed_tracks: &[String],
        _limit: u32,
    ) -> Res<Vec<SpotifyTrack>> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.batches.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.lock().unwrap().clone()))
    }

    async fn create_playlist(
        &self,
        _token: &Token,
        _user_id: &str,
        name: &str,
        _description: &str,
    ) -> Res<CreatePlaylistResponse> {
        let n = self.playlist_creates.fetch_add(1, Ordering::SeqCst);
        Ok(CreatePlaylistResponse {
            id: format!("playlist-{}", n + 1),
            name: name.to_string(),
        })
    }

    async fn add_track_to_playlist(
        &self,
        _token: &Token,
        playlist_id: &str,
        track_id: &str,
    ) -> Res<()> {
        if self
            .add_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(Error::UpstreamUnavailable("stubbed add failure".to_string()));
        }
        self.playlist_adds
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), track_id.to_string()));
        Ok(())
    }

    async fn search(&self, _token: &Token, _query: &str) -> Res<Value> {
        Ok(json!({ "tracks": { "items": [] } }))
    }
}

pub fn token_with_access(access_token: &str) -> Token {
    Token {
        access_token: access_token.to_string(),
        refresh_token: Some("refresh-1".to_string()),
        scope: None,
        expires_in: 3600,
        obtained_at: chrono::Utc::now().timestamp() as u64,
    }
}

pub fn token() -> Token {
    token_with_access("access-1")
}

pub fn track(id: &str, preview_url: Option<&str>) -> SpotifyTrack {
    SpotifyTrack {
        id: id.to_string(),
        name: format!("Track {}", id),
        preview_url: preview_url.map(str::to_string),
        artists: vec![SpotifyArtist {
            id: None,
            name: "Artist".to_string(),
        }],
        album: SpotifyAlbum::default(),
    }
}

pub fn interaction(track_id: &str, action: SwipeAction) -> Interaction {
    Interaction {
        track_id: track_id.to_string(),
        name: format!("Track {}", track_id),
        artists: vec!["Artist".to_string()],
        images: vec!["cover.jpg".to_string()],
        action,
    }
}

/// Unique path for a throwaway store file. The parent directory is created
/// by the store itself.
pub fn temp_store_path(file: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("juke-tests-{}", utils::generate_random_string(12)));
    path.push(file);
    path
}
