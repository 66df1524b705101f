/// Errors from completing the authorization-code handshake.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The authorization server declined or the user cancelled.
    #[error("Authorization failed: {error}{}", .description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    RemoteAuth {
        error: String,
        description: Option<String>,
    },

    /// Returned `state` does not match the stored one. Ephemeral state is wiped.
    #[error("Security error: state mismatch (possible CSRF attack)")]
    CsrfMismatch,

    /// The stored code verifier is gone (storage cleared mid-flow).
    #[error("Code verifier not found")]
    MissingVerifier,

    /// Token endpoint rejected the exchange or could not be reached.
    #[error("Token exchange failed: {0}")]
    TokenExchange(#[source] crate::error::Error),
}
