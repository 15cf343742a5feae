//! Edit secrets — opaque bearer tokens that unlock mutation for one user.
//!
//! ARCHITECTURE
//! ============
//! A secret travels as the `secret` query parameter on page views and as the
//! `userId` form field on submissions. The clear token is returned once at
//! issue time; only its sha256 hash is stored, and verification is a lookup
//! of that hash followed by an owner comparison.

use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::store::{FrameStore, StoreError};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

#[must_use]
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Issue a new edit secret for `user_id`, returning the clear token.
///
/// # Errors
///
/// Returns a store error if the hash cannot be persisted.
pub async fn issue_secret(store: &dyn FrameStore, user_id: Uuid) -> Result<String, StoreError> {
    let secret = generate_secret();
    store.insert_secret(user_id, &hash_secret(&secret)).await?;
    tracing::info!(%user_id, "edit secret issued");
    Ok(secret)
}

/// Check that `presented` is a live secret belonging to `user_id`.
/// Empty or unknown tokens never verify.
///
/// # Errors
///
/// Returns a store error if the lookup fails.
pub async fn verify_secret(store: &dyn FrameStore, user_id: Uuid, presented: &str) -> Result<bool, StoreError> {
    let presented = presented.trim();
    if presented.is_empty() {
        return Ok(false);
    }
    let owner = store.find_secret_owner(&hash_secret(presented)).await?;
    Ok(owner == Some(user_id))
}

#[cfg(test)]
#[path = "secret_test.rs"]
mod tests;
