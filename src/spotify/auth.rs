use crate::{config, utils};

/// Permission scopes requested during authorization. Fixed list: profile
/// and email for provisioning, top tracks for recommendation seeds, and
/// playlist modification for the liked-tracks playlist.
pub const SCOPES: [&str; 5] = [
    "user-read-private",
    "user-read-email",
    "user-top-read",
    "playlist-modify-public",
    "playlist-modify-private",
];

/// Builds the authorization redirect URL carrying the given state nonce.
///
/// The nonce must already be stored in the caller's session; the callback
/// validates the round-tripped copy against it.
pub fn authorize_url(state: &str) -> String {
    format!(
        "{auth_url}?response_type=code&client_id={client_id}&scope={scope}&redirect_uri={redirect_uri}&state={state}",
        auth_url = &config::spotify_apiauth_url(),
        client_id = urlencoding::encode(&config::spotify_client_id()),
        scope = urlencoding::encode(&SCOPES.join(" ")),
        redirect_uri = urlencoding::encode(&config::spotify_redirect_uri()),
        state = state,
    )
}

/// Generates the anti-forgery state nonce for a new authorization attempt.
pub fn generate_state() -> String {
    utils::generate_state()
}
