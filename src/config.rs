use std::time::Duration;

use url::Url;

use crate::error::Error;
use crate::oauth::OAuthConfig;
use crate::player::SETTLE_DELAY;

/// Client ID baked in at build time (`SPOTIFY_CLIENT_ID=... cargo build`).
const BUILD_CLIENT_ID: Option<&str> = option_env!("SPOTIFY_CLIENT_ID");

/// Full client configuration: OAuth endpoints plus client-side tuning.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) oauth: OAuthConfig,
    pub(crate) settle_delay: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(oauth: OAuthConfig) -> Self {
        Self {
            oauth,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required
    /// - `SPOTIFY_CLIENT_ID`: registered client ID; falls back to the value
    ///   injected at build time
    /// - `SPOTIFY_REDIRECT_URI`: the page Spotify redirects back to
    ///
    /// # Optional
    /// - `SPOTIFY_AUTH_URL`, `SPOTIFY_TOKEN_URL`, `SPOTIFY_API_URL`, `SPOTIFY_LOGOUT_URL`
    /// - `SPOTIFY_SETTLE_DELAY_MS`: wait before re-fetching after a command
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if required values are missing or invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if required values are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let client_id = lookup("SPOTIFY_CLIENT_ID")
            .or_else(|| BUILD_CLIENT_ID.map(str::to_string))
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::Config("SPOTIFY_CLIENT_ID is required".into()))?;
        let redirect_uri = lookup("SPOTIFY_REDIRECT_URI")
            .ok_or_else(|| Error::Config("SPOTIFY_REDIRECT_URI is required".into()))?;
        let redirect_uri = parse_url("SPOTIFY_REDIRECT_URI", &redirect_uri)?;

        let mut oauth = OAuthConfig::new(client_id, redirect_uri);

        if let Some(url) = lookup("SPOTIFY_AUTH_URL") {
            oauth = oauth.with_auth_url(parse_url("SPOTIFY_AUTH_URL", &url)?);
        }
        if let Some(url) = lookup("SPOTIFY_TOKEN_URL") {
            oauth = oauth.with_token_url(parse_url("SPOTIFY_TOKEN_URL", &url)?);
        }
        if let Some(url) = lookup("SPOTIFY_API_URL") {
            oauth = oauth.with_api_url(parse_url("SPOTIFY_API_URL", &url)?);
        }
        if let Some(url) = lookup("SPOTIFY_LOGOUT_URL") {
            oauth = oauth.with_logout_url(parse_url("SPOTIFY_LOGOUT_URL", &url)?);
        }

        let mut config = Self::new(oauth);
        if let Some(ms) = lookup("SPOTIFY_SETTLE_DELAY_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|e| Error::Config(format!("SPOTIFY_SETTLE_DELAY_MS: {e}")))?;
            config = config.with_settle_delay(Duration::from_millis(ms));
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn oauth(&self) -> &OAuthConfig {
        &self.oauth
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, Error> {
    value
        .parse()
        .map_err(|e| Error::Config(format!("{name}: {e}")))
}
