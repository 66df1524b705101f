use std::sync::Arc;

use url::Url;

use crate::config::ClientConfig;
use crate::flow::{AuthError, Authenticator, Callback, EphemeralStore};
use crate::oauth::AuthClient;
use crate::player::{ApiError, NowPlaying, PlayerClient};
use crate::types::{PlaybackAction, Role};

/// Where the client is in the login lifecycle.
///
/// The pending-callback phase spans a full page navigation, so it is never
/// observed in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    LoggedOut,
    Authenticated(Role),
}

/// What a page load turned into.
#[derive(Debug)]
pub enum PageLoad {
    /// Fresh load, waiting for an explicit login.
    Idle,
    /// The authorization response was consumed. The page URL should be
    /// replaced with `location`.
    SignedIn { role: Role, location: Url },
}

/// The whole client: an [`Authenticator`] for the handshake and a
/// [`PlayerClient`] that owns the resulting session.
pub struct App<S> {
    auth: Authenticator<S>,
    player: PlayerClient<S>,
}

impl<S: EphemeralStore> App<S> {
    #[must_use]
    pub fn new(config: ClientConfig, store: Arc<S>) -> Self {
        Self::with_http_client(config, store, reqwest::Client::new())
    }

    /// Build with one HTTP client (connection pool) shared by both halves.
    #[must_use]
    pub fn with_http_client(config: ClientConfig, store: Arc<S>, http: reqwest::Client) -> Self {
        let player = PlayerClient::new(&config.oauth, store.clone())
            .with_http_client(http.clone())
            .with_settle_delay(config.settle_delay);
        let client = AuthClient::new(config.oauth).with_http_client(http);
        Self {
            auth: Authenticator::new(client, store),
            player,
        }
    }

    #[must_use]
    pub fn state(&self) -> AppState {
        match self.player.role() {
            Some(role) => AppState::Authenticated(role),
            None => AppState::LoggedOut,
        }
    }

    /// Whether playback controls should be offered at all.
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        self.player.role().is_some_and(Role::can_control_playback)
    }

    /// Startup entry point: inspect the page URL and finish a pending login.
    ///
    /// # Errors
    ///
    /// Any [`AuthError`] from [`Authenticator::complete_login`]; the client
    /// stays logged out.
    pub async fn on_page_load(&mut self, page: &Url) -> Result<PageLoad, AuthError> {
        match self.auth.complete_login(page).await? {
            Callback::NotACallback => Ok(PageLoad::Idle),
            Callback::Completed(login) => {
                let role = login.session.role();
                self.player.sign_in(login.session);
                Ok(PageLoad::SignedIn {
                    role,
                    location: login.location,
                })
            }
        }
    }

    /// Start a login; the caller navigates to the returned URL.
    #[must_use]
    pub fn login(&self, role: Role) -> Url {
        self.auth.begin_login(role)
    }

    /// End the session; the caller navigates to the returned URL.
    pub fn logout(&mut self) -> Url {
        self.player.logout()
    }

    /// # Errors
    ///
    /// See [`PlayerClient::current_track`].
    pub async fn refresh(&mut self) -> Result<NowPlaying, ApiError> {
        self.player.current_track().await
    }

    /// Send `action` and return the refreshed track.
    ///
    /// # Errors
    ///
    /// See [`PlayerClient::control_and_refresh`].
    pub async fn control(&mut self, action: PlaybackAction) -> Result<NowPlaying, ApiError> {
        self.player.control_and_refresh(action).await
    }
}
