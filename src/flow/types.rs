use url::Url;

use crate::oauth::AuthorizationRequest;
use crate::player::Session;
use crate::types::Role;

/// PKCE secrets kept between [`begin_login`](super::Authenticator::begin_login)
/// and the callback. Consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthRequest {
    pub code_verifier: String,
    pub state: String,
    pub role: Role,
}

impl From<&AuthorizationRequest> for PendingAuthRequest {
    fn from(req: &AuthorizationRequest) -> Self {
        Self {
            code_verifier: req.code_verifier.clone(),
            state: req.state.clone(),
            role: req.role,
        }
    }
}

/// Authorization response parameters read from the page URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Query keys that belong to the authorization response.
const RESPONSE_KEYS: [&str; 4] = ["code", "state", "error", "error_description"];

impl CallbackParams {
    /// Read `code`, `state`, `error` and `error_description` from the query string.
    ///
    /// Empty values count as absent, so `?code=` is not a callback.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// `url` with the authorization response parameters removed, so reloading
    /// the page cannot replay the code. Unrelated query parameters are kept.
    #[must_use]
    pub fn strip(url: &Url) -> Url {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !RESPONSE_KEYS.contains(&k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut clean = url.clone();
        clean.set_fragment(None);
        if kept.is_empty() {
            clean.set_query(None);
        } else {
            clean.query_pairs_mut().clear().extend_pairs(kept);
        }
        clean
    }
}

/// Result of inspecting a page load.
#[derive(Debug)]
pub enum Callback {
    /// No `code` parameter: a fresh page load, nothing happened.
    NotACallback,
    /// The code was exchanged.
    Completed(CompletedLogin),
}

/// A successful login: the new session and the URL the page should be
/// rewritten to (history replace, not navigation).
#[derive(Debug)]
pub struct CompletedLogin {
    pub session: Session,
    pub location: Url,
}
