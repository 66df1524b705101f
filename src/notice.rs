use std::time::{Duration, Instant};

use crate::flow::AuthError;
use crate::player::ApiError;

/// How long an error notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// A transient, user-visible message. Errors are never fatal; they are
/// shown for [`NOTICE_TTL`] and then dismissed.
#[derive(Debug, Clone)]
pub struct Notice {
    message: String,
    shown_at: Instant,
}

impl Notice {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_TTL
    }
}

impl From<&AuthError> for Notice {
    fn from(e: &AuthError) -> Self {
        Self::new(format!("Authentication error: {e}"))
    }
}

impl From<&ApiError> for Notice {
    fn from(e: &ApiError) -> Self {
        Self::new(e.to_string())
    }
}

/// Single-slot notice banner: a new notice replaces the old one.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn show(&mut self, notice: impl Into<Notice>) {
        let notice = notice.into();
        tracing::debug!(text = %notice.message, "Showing notice");
        self.current = Some(notice);
    }

    /// The visible notice at `now`, dropping it once it has expired.
    pub fn visible_at(&mut self, now: Instant) -> Option<&Notice> {
        if self.current.as_ref().is_some_and(|n| n.is_expired_at(now)) {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
