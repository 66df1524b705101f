/// Tab-scoped key/value storage for the state that has to survive the
/// authorization redirect.
///
/// In a browser this is `sessionStorage`; in tests and the terminal client it
/// is a [`MemoryStore`](super::MemoryStore). Writes go through `&self` the same
/// way `sessionStorage` does, so implementors use interior mutability.
///
/// # Example
///
/// ```rust,ignore
/// impl EphemeralStore for SessionStorage {
///     fn put(&self, key: &str, value: String) {
///         let _ = self.inner.set_item(key, &value);
///     }
///     fn get(&self, key: &str) -> Option<String> {
///         self.inner.get_item(key).ok().flatten()
///     }
///     fn remove(&self, key: &str) {
///         let _ = self.inner.remove_item(key);
///     }
///     fn clear(&self) {
///         let _ = self.inner.clear();
///     }
/// }
/// ```
pub trait EphemeralStore: Send + Sync + 'static {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: String);

    /// Read the value under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Remove a single key.
    fn remove(&self, key: &str);

    /// Remove every key.
    fn clear(&self);
}
