use std::sync::Arc;

use crate::{
    Error, Res,
    session::Session,
    spotify::{self, Upstream},
    types::{Token, User},
};

use super::UserStore;

/// Drives the OAuth authorization-code flow against the session.
///
/// States: anonymous (no nonce, no token) → awaiting callback (nonce
/// stored) → authenticated (token stored, user provisioned). The flow never
/// touches the session store itself; handlers own loading and saving.
pub struct AuthFlow {
    users: Arc<dyn UserStore>,
    upstream: Arc<dyn Upstream>,
}

impl AuthFlow {
    pub fn new(users: Arc<dyn UserStore>, upstream: Arc<dyn Upstream>) -> Self {
        AuthFlow { users, upstream }
    }

    /// Stores a fresh anti-forgery nonce in the session and returns the
    /// authorization URL to redirect the browser to.
    pub fn begin_authorization(&self, session: &mut Session) -> String {
        let state = spotify::auth::generate_state();
        session.state = Some(state.clone());
        spotify::auth::authorize_url(&state)
    }

    /// Completes the callback: validates the round-tripped state, exchanges
    /// the code for a token set, and provisions the user record on first
    /// login.
    ///
    /// The stored nonce is consumed before the comparison result is acted
    /// on, so a second callback with the same state always fails. An
    /// existing user record is left untouched; repeat logins never reset
    /// history, counters, or the playlist reference.
    pub async fn handle_callback(
        &self,
        session: &mut Session,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Res<()> {
        let expected = session.take_state();
        match (state, expected) {
            (Some(received), Some(expected)) if received == expected => {}
            _ => return Err(Error::StateMismatch),
        }

        let code = code.ok_or_else(|| {
            Error::TokenExchangeFailed("callback carried no authorization code".to_string())
        })?;

        let token = self.upstream.exchange_code(code).await?;
        session.set_token(token.clone());
        session.logged_in = true;

        let profile = self.upstream.profile(&token).await?;
        if self.users.find(&profile.id).await?.is_none() {
            let name = profile.display_name.clone().unwrap_or_default();
            self.users.insert(User::new(profile.id.clone(), name)).await?;
        }
        session.user = Some(profile);

        Ok(())
    }

    /// Returns a usable access token for the session, refreshing an expired
    /// one in place. Fails with `NotAuthenticated` when there is no token
    /// or the refresh cannot produce one.
    pub async fn valid_token(&self, session: &mut Session) -> Res<Token> {
        let Some(token) = session.token().cloned() else {
            return Err(Error::NotAuthenticated);
        };
        if token.access_token.is_empty() {
            return Err(Error::NotAuthenticated);
        }
        if !token.is_expired() {
            return Ok(token);
        }

        let Some(refresh) = token.refresh_token.clone() else {
            return Err(Error::NotAuthenticated);
        };
        let mut fresh = self
            .upstream
            .refresh_token(&refresh)
            .await
            .map_err(|_| Error::NotAuthenticated)?;
        // Spotify may rotate the refresh token or omit it; keep the old one
        // when none comes back.
        if fresh.refresh_token.is_none() {
            fresh.refresh_token = Some(refresh);
        }
        session.set_token(fresh.clone());
        Ok(fresh)
    }
}
