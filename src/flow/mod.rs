//! Authorization Code + PKCE login flow.
//!
//! ```rust,ignore
//! use nowplaying_pkce::flow::{Authenticator, Callback, MemoryStore};
//!
//! let auth = Authenticator::new(AuthClient::new(config), Arc::new(MemoryStore::new()));
//!
//! // 1. Send the user to Spotify
//! let url = auth.begin_login(Role::Manager);
//!
//! // 2. On the page load that comes back
//! if let Callback::Completed(login) = auth.complete_login(&page_url).await? {
//!     player.sign_in(login.session);
//! }
//! ```

mod authenticator;
mod error;
mod store;
mod traits;
mod types;

pub use authenticator::Authenticator;
pub use error::AuthError;
pub use store::MemoryStore;
pub use traits::EphemeralStore;
pub use types::{Callback, CallbackParams, CompletedLogin, PendingAuthRequest};
