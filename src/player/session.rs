use crate::types::{AccessToken, Role};

/// An authenticated session: the bearer token and the role it was granted for.
///
/// Only produced by a successful code exchange and only held in memory. The
/// role is the one recorded when the login started, so it can never be wider
/// than the scopes that were requested.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: AccessToken,
    role: Role,
}

impl Session {
    pub(crate) fn new(access_token: AccessToken, role: Role) -> Self {
        Self { access_token, role }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    pub(crate) fn access_token(&self) -> &AccessToken {
        &self.access_token
    }
}
