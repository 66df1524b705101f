use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Method, StatusCode};
use url::Url;

use super::error::ApiError;
use super::model::{CurrentlyPlaying, NowPlaying};
use super::session::Session;
use crate::flow::EphemeralStore;
use crate::oauth::OAuthConfig;
use crate::types::{PlaybackAction, Role};

/// How long Spotify takes to reflect a playback command in
/// `currently-playing`. A heuristic, not a guarantee.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Holds the [`Session`] and issues the authenticated Web API calls.
///
/// The session is only created by [`sign_in`](Self::sign_in) and only
/// destroyed by [`logout`](Self::logout) or a 401 from the API.
pub struct PlayerClient<S> {
    http: reqwest::Client,
    api_url: Url,
    logout_url: Url,
    settle_delay: Duration,
    store: Arc<S>,
    session: Option<Session>,
}

impl<S: EphemeralStore> PlayerClient<S> {
    #[must_use]
    pub fn new(config: &OAuthConfig, store: Arc<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            logout_url: config.logout_url.clone(),
            settle_delay: SETTLE_DELAY,
            store,
            session: None,
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Override the delay [`control_and_refresh`](Self::control_and_refresh) waits.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Install the session produced by a completed login.
    pub fn sign_in(&mut self, session: Session) {
        tracing::debug!(role = %session.role(), "Session installed");
        self.session = Some(session);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Role of the active session, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(Session::role)
    }

    /// Fetch what is currently playing.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotAuthenticated`] without a session
    /// - [`ApiError::TokenExpired`] on 401; the session is gone afterwards
    /// - [`ApiError::Status`] for any other non-success status
    pub async fn current_track(&mut self) -> Result<NowPlaying, ApiError> {
        let url = self.endpoint(&["me", "player", "currently-playing"]);
        let response = self.send(Method::GET, url).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(NowPlaying::Nothing);
        }
        let body = response.json::<CurrentlyPlaying>().await?;
        Ok(body.into())
    }

    /// Send a playback command.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotAuthenticated`] without a session
    /// - [`ApiError::InsufficientPrivilege`] on 403
    /// - [`ApiError::TokenExpired`] on 401; the session is gone afterwards
    /// - [`ApiError::Status`] for any other non-success status
    pub async fn control_playback(&mut self, action: PlaybackAction) -> Result<(), ApiError> {
        let url = self.endpoint(&["me", "player", action.path()]);
        self.send(action.method(), url).await?;
        tracing::debug!(action = %action, "Playback command accepted");
        Ok(())
    }

    /// [`control_playback`](Self::control_playback), then wait for the state to
    /// settle and re-fetch the current track.
    ///
    /// # Errors
    ///
    /// Any error from either call.
    pub async fn control_and_refresh(
        &mut self,
        action: PlaybackAction,
    ) -> Result<NowPlaying, ApiError> {
        self.control_playback(action).await?;
        tokio::time::sleep(self.settle_delay).await;
        self.current_track().await
    }

    /// Drop the session and all ephemeral state, and return Spotify's logout
    /// page so the caller can end the remote session too.
    pub fn logout(&mut self) -> Url {
        self.teardown();
        tracing::info!("Logged out");
        self.logout_url.clone()
    }

    fn teardown(&mut self) {
        self.session = None;
        self.store.clear();
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&mut self, method: Method, url: Url) -> Result<reqwest::Response, ApiError> {
        let session = self.session.as_ref().ok_or(ApiError::NotAuthenticated)?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(session.access_token().secret());
        if method != Method::GET {
            request = request.header(CONTENT_LENGTH, 0);
        }
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Access token rejected, ending session");
                self.teardown();
                Err(ApiError::TokenExpired)
            }
            StatusCode::FORBIDDEN => {
                tracing::warn!(%method, "Playback control forbidden for this session");
                Err(ApiError::InsufficientPrivilege)
            }
            status => {
                tracing::warn!(status = status.as_u16(), "Spotify API error");
                Err(ApiError::Status(status.as_u16()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::flow::MemoryStore;
    use crate::types::AccessToken;

    fn client(server: &MockServer, role: Option<Role>) -> (PlayerClient<MemoryStore>, Arc<MemoryStore>) {
        let config = OAuthConfig::new("test-client", "https://example.com/".parse().unwrap())
            .with_api_url(format!("{}/v1", server.uri()).parse().unwrap());
        let store = Arc::new(MemoryStore::new());
        store.put("user_profile", "manager".into());

        let mut client = PlayerClient::new(&config, store.clone()).with_settle_delay(Duration::ZERO);
        if let Some(role) = role {
            client.sign_in(Session::new(AccessToken::new("T"), role));
        }
        (client, store)
    }

    #[tokio::test]
    async fn current_track_requires_session() {
        let server = MockServer::start().await;
        let (mut client, _) = client(&server, None);

        let err = client.current_track().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));

        let err = client.control_playback(PlaybackAction::Play).await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
    }

    #[tokio::test]
    async fn current_track_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .and(header("Authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "is_playing": true,
                "item": {
                    "name": "Song",
                    "artists": [{ "name": "Band" }],
                    "album": { "name": "Record", "images": [{ "url": "https://img/1" }] }
                }
            })))
            .mount(&server)
            .await;

        let (mut client, _) = client(&server, Some(Role::Viewer));
        let NowPlaying::Track(track) = client.current_track().await.unwrap() else {
            panic!("expected a track");
        };
        assert_eq!(track.name, "Song");
        assert_eq!(track.artists, "Band");
        assert!(track.is_playing);
    }

    #[tokio::test]
    async fn no_content_is_nothing_playing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (mut client, _) = client(&server, Some(Role::Viewer));
        assert_eq!(client.current_track().await.unwrap(), NowPlaying::Nothing);
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn unauthorized_tears_down_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (mut client, store) = client(&server, Some(Role::Manager));
        let err = client.current_track().await.unwrap_err();

        assert!(matches!(err, ApiError::TokenExpired));
        assert!(!client.is_authenticated());
        assert_eq!(client.role(), None);
        assert!(store.is_empty());

        let err = client.current_track().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
    }

    #[tokio::test]
    async fn unauthorized_control_tears_down_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/me/player/next"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let (mut client, store) = client(&server, Some(Role::Manager));
        let err = client.control_playback(PlaybackAction::Next).await.unwrap_err();

        assert!(matches!(err, ApiError::TokenExpired));
        assert!(!client.is_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn other_status_is_generic_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (mut client, _) = client(&server, Some(Role::Viewer));
        let err = client.current_track().await.unwrap_err();

        assert!(matches!(err, ApiError::Status(503)));
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn forbidden_pause_is_insufficient_privilege() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/me/player/pause"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let (mut client, _) = client(&server, Some(Role::Viewer));
        let err = client.control_playback(PlaybackAction::Pause).await.unwrap_err();

        assert!(matches!(err, ApiError::InsufficientPrivilege));
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn control_uses_expected_verbs() {
        let server = MockServer::start().await;
        for (verb, action) in [("PUT", "play"), ("PUT", "pause"), ("POST", "next"), ("POST", "previous")] {
            Mock::given(method(verb))
                .and(path(format!("/v1/me/player/{action}")))
                .and(header("Authorization", "Bearer T"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;
        }

        let (mut client, _) = client(&server, Some(Role::Manager));
        for action in [
            PlaybackAction::Play,
            PlaybackAction::Pause,
            PlaybackAction::Next,
            PlaybackAction::Previous,
        ] {
            client.control_playback(action).await.unwrap();
        }
    }

    #[tokio::test]
    async fn control_and_refresh_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/me/player/next"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/me/player/currently-playing"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let (mut client, _) = client(&server, Some(Role::Manager));
        let now = client.control_and_refresh(PlaybackAction::Next).await.unwrap();
        assert_eq!(now, NowPlaying::Nothing);
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let server = MockServer::start().await;
        let (mut client, store) = client(&server, Some(Role::Manager));

        let url = client.logout();

        assert_eq!(url.as_str(), "https://www.spotify.com/logout/");
        assert!(!client.is_authenticated());
        assert!(store.is_empty());
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let config = OAuthConfig::new("c", "https://example.com/".parse().unwrap());
        let client = PlayerClient::new(&config, Arc::new(MemoryStore::new()));

        assert_eq!(
            client.endpoint(&["me", "player", "next"]).as_str(),
            "https://api.spotify.com/v1/me/player/next"
        );
    }
}
