#![doc = include_str!("../README.md")]

pub mod app;
pub mod config;
pub mod error;
pub mod flow;
pub mod notice;
pub mod oauth;
pub mod pkce;
pub mod player;
pub mod types;

// Re-exports for convenient access
pub use app::{App, AppState, PageLoad};
pub use config::ClientConfig;
pub use error::Error;
pub use flow::{AuthError, Authenticator, Callback, EphemeralStore, MemoryStore};
pub use notice::{Notice, NoticeBoard};
pub use oauth::{AuthClient, AuthorizationRequest, OAuthConfig, TokenResponse};
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_random_string, generate_state};
pub use player::{ApiError, NowPlaying, PlayerClient, Session, TrackView};
pub use types::{PlaybackAction, Role};
