/// Errors from the Web API calls made on behalf of a session.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// No session: log in first.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// 401 from the API. The session has already been torn down.
    #[error("Token expired, please log in again")]
    TokenExpired,

    /// 403 from the API: the granted scopes (or the account tier) do not
    /// allow playback control.
    #[error("Playback control requires the manager role and a Spotify Premium account")]
    InsufficientPrivilege,

    /// Any other non-success status.
    #[error("Spotify API returned status {0}")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
