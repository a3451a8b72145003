use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

/// Length of the anti-forgery state nonce sent with the authorization
/// request. The upstream contract only requires it to be opaque; 16
/// alphanumeric characters match the original deployment.
pub const STATE_LENGTH: usize = 16;

/// Generates a random alphanumeric string of the given length.
pub fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generates the single-use anti-forgery state nonce.
pub fn generate_state() -> String {
    generate_random_string(STATE_LENGTH)
}

/// Builds the HTTP Basic authorization value for the token endpoint from
/// the client credentials.
pub fn basic_auth(client_id: &str, client_secret: &str) -> String {
    let raw = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}
