//! Session holder and Spotify Web API playback calls.

mod client;
mod error;
mod model;
mod session;

pub use client::{PlayerClient, SETTLE_DELAY};
pub use error::ApiError;
pub use model::{Album, Artist, CurrentlyPlaying, Image, NowPlaying, Track, TrackView};
pub use session::Session;
