use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// RFC 7636 unreserved characters: `A-Z a-z 0-9 - . _ ~`.
pub const UNRESERVED: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Length of a generated code verifier (the RFC 7636 maximum).
pub const CODE_VERIFIER_LEN: usize = 128;

/// Length of a generated CSRF `state` nonce.
pub const STATE_LEN: usize = 16;

/// Generates `length` characters drawn uniformly from [`UNRESERVED`] using the
/// thread-local CSPRNG.
#[must_use]
pub fn generate_random_string(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(UNRESERVED[rng.random_range(0..UNRESERVED.len())]))
        .collect()
}

/// Generates a cryptographically random code verifier for PKCE.
///
/// Returns a 128-character string over the unreserved charset (RFC 7636 allows 43-128).
#[must_use]
pub fn generate_code_verifier() -> String {
    generate_random_string(CODE_VERIFIER_LEN)
}

/// Computes the S256 code challenge from a code verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`, no padding.
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generates a 16-character `state` nonce for CSRF protection.
#[must_use]
pub fn generate_state() -> String {
    generate_random_string(STATE_LEN)
}
