//! Cookie-bound server-side session state.
//!
//! Each browser gets one [`Session`], correlated by a random id carried in a
//! cookie. The session owns the OAuth token set for that browser (the token
//! store), the single-use anti-forgery state nonce, and a denormalized
//! profile snapshot. Sessions are never shared across users and hold no
//! persistent data; destroying one only forces a fresh login.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    Res,
    types::{Token, UserProfile},
    utils,
};

/// Per-browser session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Single-use anti-forgery nonce, present only between `/login` and the
    /// callback. Taken (cleared) on first validation attempt.
    pub state: Option<String>,
    /// OAuth token set for this browser, populated by the authorization flow.
    pub token: Option<Token>,
    pub logged_in: bool,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Stores a fresh token set, stamping the time it was obtained.
    pub fn set_token(&mut self, mut token: Token) {
        if token.obtained_at == 0 {
            token.obtained_at = chrono::Utc::now().timestamp() as u64;
        }
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn clear_token(&mut self) {
        self.token = None;
        self.logged_in = false;
    }

    /// Removes and returns the stored state nonce. The nonce is single-use:
    /// whatever the comparison outcome, it must not survive the callback.
    pub fn take_state(&mut self) -> Option<String> {
        self.state.take()
    }
}

/// Server-side session storage, keyed by the cookie-carried session id.
///
/// Backing storage and expiry policy are the implementor's concern; the
/// default in-process map simply lives as long as the server.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session for `sid`, or a fresh one if none exists yet.
    async fn load(&self, sid: &str) -> Session;

    /// Writes the session back. Fails with a session-persist error when the
    /// backing store cannot be written.
    async fn save(&self, sid: &str, session: Session) -> Res<()>;

    /// Drops the session entirely. Idempotent.
    async fn destroy(&self, sid: &str);
}

/// In-memory session store used by the default server wiring.
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, sid: &str) -> Session {
        let sessions = self.sessions.lock().await;
        sessions.get(sid).cloned().unwrap_or_default()
    }

    async fn save(&self, sid: &str, session: Session) -> Res<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(sid.to_string(), session);
        Ok(())
    }

    async fn destroy(&self, sid: &str) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(sid);
    }
}

/// Generates a fresh session id for the cookie.
pub fn new_session_id() -> String {
    utils::generate_random_string(32)
}
