use std::sync::Arc;

use url::Url;

use super::error::AuthError;
use super::store;
use super::traits::EphemeralStore;
use super::types::{Callback, CallbackParams, CompletedLogin, PendingAuthRequest};
use crate::oauth::AuthClient;
use crate::player::Session;
use crate::types::{AccessToken, Role};

/// Runs the two legs of the Authorization Code + PKCE handshake.
///
/// The redirect to Spotify leaves the process, so the flow is split in two
/// entry points: [`begin_login`](Self::begin_login) hands back a URL to
/// navigate to, and [`complete_login`](Self::complete_login) consumes the
/// page load that comes back.
pub struct Authenticator<S> {
    client: Arc<AuthClient>,
    store: Arc<S>,
}

impl<S> Clone for Authenticator<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: EphemeralStore> Authenticator<S> {
    #[must_use]
    pub fn new(client: AuthClient, store: Arc<S>) -> Self {
        Self {
            client: Arc::new(client),
            store,
        }
    }

    #[must_use]
    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Generate fresh PKCE secrets for `role`, stash them in the ephemeral
    /// store, and return the authorization URL the caller must navigate to.
    #[must_use]
    pub fn begin_login(&self, role: Role) -> Url {
        let auth_req = self.client.authorization_url(role);
        store::save_pending(self.store.as_ref(), &PendingAuthRequest::from(&auth_req));

        tracing::info!(role = %role, "Starting Spotify authorization");
        auth_req.url
    }

    /// Inspect the page load at `page` and finish the handshake if it carries
    /// an authorization response.
    ///
    /// # Errors
    ///
    /// - [`AuthError::RemoteAuth`] if the URL carries `error`
    /// - [`AuthError::CsrfMismatch`] if `state` differs from the stored one;
    ///   the ephemeral store is cleared and no exchange is attempted
    /// - [`AuthError::MissingVerifier`] if the verifier is gone
    /// - [`AuthError::TokenExchange`] if the token endpoint fails
    pub async fn complete_login(&self, page: &Url) -> Result<Callback, AuthError> {
        let params = CallbackParams::from_url(page);

        if let Some(error) = params.error {
            tracing::warn!(error = %error, "Authorization error from Spotify");
            return Err(AuthError::RemoteAuth {
                error,
                description: params.error_description,
            });
        }

        let Some(code) = params.code else {
            return Ok(Callback::NotACallback);
        };

        let store = self.store.as_ref();

        match (params.state.as_deref(), store::get_state(store).as_deref()) {
            (Some(received), Some(stored)) if received == stored => {}
            _ => {
                tracing::warn!("OAuth state mismatch");
                store.clear();
                return Err(AuthError::CsrfMismatch);
            }
        }

        let code_verifier = store::get_verifier(store).ok_or(AuthError::MissingVerifier)?;
        let role = store::get_role(store);

        let result = self.client.exchange_code(&code, &code_verifier).await;
        // Verifier and state are spent by this attempt, success or not.
        store::clear_pkce(store);

        let token_response = result.map_err(|e| {
            tracing::error!(error = %e, "Token exchange failed");
            AuthError::TokenExchange(e)
        })?;

        let session = Session::new(AccessToken::new(token_response.access_token), role);
        tracing::info!(role = %role, "Spotify login successful");

        Ok(Callback::Completed(CompletedLogin {
            session,
            location: CallbackParams::strip(page),
        }))
    }
}
