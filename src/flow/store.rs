use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::traits::EphemeralStore;
use super::types::PendingAuthRequest;
use crate::types::Role;

pub(crate) const VERIFIER_KEY: &str = "pkce_verifier";
pub(crate) const STATE_KEY: &str = "auth_state";
pub(crate) const ROLE_KEY: &str = "user_profile";

/// In-memory [`EphemeralStore`]: lives exactly as long as the client instance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EphemeralStore for MemoryStore {
    fn put(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }

    fn clear(&self) {
        self.entries().clear();
    }
}

/// Persist the pending request under the three well-known keys.
pub(super) fn save_pending<S: EphemeralStore + ?Sized>(store: &S, pending: &PendingAuthRequest) {
    store.put(VERIFIER_KEY, pending.code_verifier.clone());
    store.put(STATE_KEY, pending.state.clone());
    store.put(ROLE_KEY, pending.role.to_string());
}

/// Persisted CSRF state, if any.
pub(super) fn get_state<S: EphemeralStore + ?Sized>(store: &S) -> Option<String> {
    store.get(STATE_KEY)
}

/// Persisted PKCE verifier, if any.
pub(super) fn get_verifier<S: EphemeralStore + ?Sized>(store: &S) -> Option<String> {
    store.get(VERIFIER_KEY)
}

/// Persisted role. Missing or unrecognised values fall back to viewer.
pub(super) fn get_role<S: EphemeralStore + ?Sized>(store: &S) -> Role {
    store
        .get(ROLE_KEY)
        .and_then(|r| r.parse().ok())
        .unwrap_or_default()
}

/// Drop the verifier and state; the role key is left alone.
pub(super) fn clear_pkce<S: EphemeralStore + ?Sized>(store: &S) {
    store.remove(VERIFIER_KEY);
    store.remove(STATE_KEY);
}
