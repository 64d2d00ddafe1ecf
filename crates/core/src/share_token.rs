//! Public share-link tokens for customer-facing shortlist versions.
//!
//! A token is generated once when a version is published and is the only
//! thing a customer holds. It is an opaque key, not a credential with a
//! lifetime, so it is stored as-is and staff can re-send the same link.

use rand::Rng;

/// Length of a generated share token (alphanumeric characters).
pub const SHARE_TOKEN_LENGTH: usize = 32;

/// Generate a new random share token.
pub fn generate_share_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(SHARE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Cheap shape check run before any token lookup hits the database.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == SHARE_TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Build the customer-facing URL for a token.
pub fn share_url(public_base_url: &str, token: &str) -> String {
    format!("{}/shortlist/{token}", public_base_url.trim_end_matches('/'))
}
