use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Permission tier chosen at login.
///
/// The tier decides which scopes are requested from Spotify; the granted scopes
/// are what the API enforces, so a role can never be widened after login.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only: may look at the current track.
    #[default]
    #[display("viewer")]
    Viewer,
    /// Read + write: may also control playback.
    #[display("manager")]
    Manager,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Viewer, Role::Manager];

    /// Space-separated scope string requested for this role.
    #[must_use]
    pub const fn scope(self) -> &'static str {
        match self {
            Self::Viewer => "user-read-playback-state",
            Self::Manager => "user-read-playback-state user-modify-playback-state",
        }
    }

    /// Whether the requested scopes include playback control.
    #[must_use]
    pub const fn can_control_playback(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Self::Viewer),
            "manager" => Ok(Self::Manager),
            other => Err(Error::Config(format!("unknown role: {other}"))),
        }
    }
}

/// Playback command accepted by the player endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PlaybackAction {
    #[display("play")]
    Play,
    #[display("pause")]
    Pause,
    #[display("next")]
    Next,
    #[display("previous")]
    Previous,
}

impl PlaybackAction {
    /// Play/pause replace the player state (`PUT`); next/previous trigger a skip (`POST`).
    #[must_use]
    pub fn method(self) -> reqwest::Method {
        match self {
            Self::Play | Self::Pause => reqwest::Method::PUT,
            Self::Next | Self::Previous => reqwest::Method::POST,
        }
    }

    /// Path segment under `/me/player/`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }

    /// The toggle a play/pause button issues given the last known state.
    #[must_use]
    pub const fn toggle(is_playing: bool) -> Self {
        if is_playing { Self::Pause } else { Self::Play }
    }
}

impl std::str::FromStr for PlaybackAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            other => Err(Error::Config(format!("unknown playback action: {other}"))),
        }
    }
}

/// Opaque bearer credential.
///
/// `Debug` is redacted; the raw value is only reachable inside the crate.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_scopes() {
        assert_eq!(Role::Viewer.scope(), "user-read-playback-state");
        assert!(!Role::Viewer.scope().contains("modify"));
        assert!(Role::Manager.scope().contains("user-modify-playback-state"));
        assert!(Role::Manager.scope().contains("user-read-playback-state"));
    }

    #[test]
    fn role_roundtrips_through_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
        assert!("Manager".parse::<Role>().is_err());
    }

    #[test]
    fn only_manager_controls_playback() {
        assert!(Role::Manager.can_control_playback());
        assert!(!Role::Viewer.can_control_playback());
    }

    #[test]
    fn action_verbs() {
        assert_eq!(PlaybackAction::Play.method(), reqwest::Method::PUT);
        assert_eq!(PlaybackAction::Pause.method(), reqwest::Method::PUT);
        assert_eq!(PlaybackAction::Next.method(), reqwest::Method::POST);
        assert_eq!(PlaybackAction::Previous.method(), reqwest::Method::POST);
    }

    #[test]
    fn toggle_follows_last_known_state() {
        assert_eq!(PlaybackAction::toggle(true), PlaybackAction::Pause);
        assert_eq!(PlaybackAction::toggle(false), PlaybackAction::Play);
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
        assert_eq!(token.secret(), "super-secret");
    }
}
