use chrono::Utc;
use reqwest::{Client, Method, header::CONTENT_TYPE};
use serde_json::{Value, json};

use crate::{
    Error, Res, config,
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatePlaylistResponse, RecommendationsResponse,
        SpotifyTrack, Token, TopTracksResponse, UserProfile,
    },
    utils,
};

use super::Upstream;

/// Authenticated HTTP wrapper around the Spotify Web API.
///
/// Holds the endpoint URLs and client credentials resolved once at startup.
/// All resource calls go through [`SpotifyClient::call`], which attaches the
/// bearer token and normalizes failures into the crate error taxonomy.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl SpotifyClient {
    /// Builds a client against explicit endpoints. Tests point this at a
    /// local stub server.
    pub fn new(
        api_url: String,
        token_url: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url,
            token_url,
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Builds a client from the process configuration.
    pub fn from_config() -> Self {
        SpotifyClient::new(
            config::spotify_apiurl(),
            config::spotify_apitoken_url(),
            config::spotify_client_id(),
            config::spotify_client_secret(),
            config::spotify_redirect_uri(),
        )
    }

    /// Performs one bearer-authenticated JSON call against the Web API.
    ///
    /// Fails with `NotAuthenticated` before any network attempt when the
    /// token is empty, and with `UpstreamUnavailable` on transport failure,
    /// a non-success status, or a body that is not JSON. The status check
    /// comes first: a `403` with a well-formed error body must never read
    /// as success to callers that discard or pass through the body. No
    /// retries; the caller owns that policy.
    pub async fn call(
        &self,
        token: &Token,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Res<Value> {
        if token.access_token.is_empty() {
            return Err(Error::NotAuthenticated);
        }

        let url = format!("{}/{}", self.api_url, endpoint);
        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&token.access_token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;
        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(Error::UpstreamUnavailable(format!(
                "{} from {}: {}",
                status, endpoint, snippet
            )));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| Error::UpstreamUnavailable(e.to_string()))
    }

    /// Server-to-server POST against the token endpoint with Basic-auth
    /// client credentials. Shared by code exchange and refresh.
    async fn token_request(&self, form: &[(&str, &str)]) -> Res<Token> {
        let response = self
            .http
            .post(&self.token_url)
            .header(
                "Authorization",
                utils::basic_auth(&self.client_id, &self.client_secret),
            )
            .form(form)
            .send()
            .await?;

        let json = response
            .json::<Value>()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        match json.get("access_token").and_then(Value::as_str) {
            Some(access_token) if !access_token.is_empty() => Ok(Token {
                access_token: access_token.to_string(),
                refresh_token: json
                    .get("refresh_token")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                scope: json.get("scope").and_then(Value::as_str).map(str::to_string),
                expires_in: json.get("expires_in").and_then(Value::as_u64).unwrap_or(3600),
                obtained_at: Utc::now().timestamp() as u64,
            }),
            _ => {
                let reason = json
                    .get("error_description")
                    .or_else(|| json.get("error"))
                    .and_then(Value::as_str)
                    .unwrap_or("no access token in response");
                Err(Error::TokenExchangeFailed(reason.to_string()))
            }
        }
    }
}

#[async_trait::async_trait]
impl Upstream for SpotifyClient {
    async fn exchange_code(&self, code: &str) -> Res<Token> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Res<Token> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn profile(&self, token: &Token) -> Res<UserProfile> {
        let json = self.call(token, "me", Method::GET, None).await?;
        let profile: UserProfile = serde_json::from_value(json)
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;
        Ok(profile)
    }

    async fn top_tracks(&self, token: &Token, limit: u32) -> Res<Vec<SpotifyTrack>> {
        let endpoint = format!("me/top/tracks?time_range=short_term&limit={}", limit);
        let json = self.call(token, &endpoint, Method::GET, None).await?;
        let response: TopTracksResponse = serde_json::from_value(json)
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;
        Ok(response.items)
    }

    async fn recommendations(
        &self,
        token: &Token,
        seed_tracks: &[String],
        limit: u32,
    ) -> Res<Vec<SpotifyTrack>> {
        let endpoint = format!(
            "recommendations?limit={limit}&seed_tracks={seeds}",
            limit = limit,
            seeds = seed_tracks.join(","),
        );
        let json = self.call(token, &endpoint, Method::GET, None).await?;
        let response: RecommendationsResponse = serde_json::from_value(json)
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;
        Ok(response.tracks)
    }

    async fn create_playlist(
        &self,
        token: &Token,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Res<CreatePlaylistResponse> {
        let endpoint = format!("users/{}/playlists", user_id);
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };
        let json = self
            .call(token, &endpoint, Method::POST, Some(json!(body)))
            .await?;
        let playlist: CreatePlaylistResponse = serde_json::from_value(json)
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;
        Ok(playlist)
    }

    async fn add_track_to_playlist(
        &self,
        token: &Token,
        playlist_id: &str,
        track_id: &str,
    ) -> Res<()> {
        let endpoint = format!("playlists/{}/tracks", playlist_id);
        let body = AddTracksRequest {
            uris: vec![format!("spotify:track:{}", track_id)],
        };
        self.call(token, &endpoint, Method::POST, Some(json!(body)))
            .await?;
        Ok(())
    }

    async fn search(&self, token: &Token, query: &str) -> Res<Value> {
        let endpoint = format!(
            "search?q={}&type=track,artist,album&limit=10",
            urlencoding::encode(query)
        );
        self.call(token, &endpoint, Method::GET, None).await
    }
}
