use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// Failures are never logged-and-ignored inside helpers; they travel up as
/// one of these variants and are converted at the route boundary into a
/// redirect marker or a JSON error response.
#[derive(Debug, Error)]
pub enum Error {
    /// The callback carried no state value or one that does not match the
    /// nonce stored in the session. Forged or replayed callback.
    #[error("callback state missing or does not match the session")]
    StateMismatch,

    /// The token endpoint did not return an access token.
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Transport failure or a non-JSON body from the Spotify API.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The session holds no usable access token.
    #[error("not authenticated")]
    NotAuthenticated,

    /// No persisted user record for the given id.
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// The session store failed to write.
    #[error("session save failed: {0}")]
    SessionPersist(String),

    /// The user or track store failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::UpstreamUnavailable(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl Error {
    /// Short machine-readable marker, also used in `/#error=<marker>`
    /// redirects after a failed authorization callback.
    pub fn marker(&self) -> &'static str {
        match self {
            Error::StateMismatch => "state_mismatch",
            Error::TokenExchangeFailed(_) => "token_request_failed",
            Error::UpstreamUnavailable(_) => "upstream_unavailable",
            Error::NotAuthenticated => "not_authenticated",
            Error::UnknownUser(_) => "unknown_user",
            Error::SessionPersist(_) => "session_save_error",
            Error::Storage(_) => "storage_error",
            Error::Config(_) => "config_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::StateMismatch => StatusCode::BAD_REQUEST,
            Error::TokenExchangeFailed(_) => StatusCode::BAD_GATEWAY,
            Error::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::UnknownUser(_) => StatusCode::NOT_FOUND,
            Error::SessionPersist(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "error": self.marker(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
