//! Account provisioning for the admin CLI.
//!
//! Users are never created through the page route. The admin CLI creates
//! them here together with a first collection, so the page has something to
//! load, and an initial edit secret.

use crate::services::{page, secret};
use crate::store::{FrameStore, StoreError, UserRow};

pub const FIRST_COLLECTION_NAME: &str = "My Frames";
const MAX_USERNAME_LEN: usize = 32;
/// First path segments owned by other routes.
const RESERVED_USERNAMES: &[&str] = &["api", "healthz"];

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid username {0:?}: use 1-32 of a-z, 0-9, '-' or '_'")]
    InvalidUsername(String),
    #[error("username {0:?} is reserved")]
    ReservedUsername(String),
    #[error("user not found: {0}")]
    UnknownUser(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl crate::error::ErrorCode for AccountError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUsername(_) => "E_INVALID_USERNAME",
            Self::ReservedUsername(_) => "E_RESERVED_USERNAME",
            Self::UnknownUser(_) => "E_UNKNOWN_USER",
            Self::Store(_) => "E_STORE",
        }
    }
}

/// Normalize and validate a username for creation.
///
/// # Errors
///
/// `InvalidUsername` if empty, too long, or using characters outside
/// `[a-z0-9_-]` after lowercasing; `ReservedUsername` if the name collides
/// with another route.
pub fn validate_username(raw: &str) -> Result<String, AccountError> {
    let username = page::normalize_username(raw);
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if username.is_empty() || username.len() > MAX_USERNAME_LEN || !valid_chars {
        return Err(AccountError::InvalidUsername(raw.to_owned()));
    }
    if RESERVED_USERNAMES.contains(&username.as_str()) {
        return Err(AccountError::ReservedUsername(username));
    }
    Ok(username)
}

/// A provisioned user plus a freshly issued clear-text secret.
#[derive(Debug)]
pub struct Provisioned {
    pub user: UserRow,
    pub secret: String,
}

/// Create a user with a first collection and an edit secret.
///
/// # Errors
///
/// `InvalidUsername`, or a store error (`Conflict` if the name is taken).
pub async fn create_user(store: &dyn FrameStore, raw_username: &str) -> Result<Provisioned, AccountError> {
    let username = validate_username(raw_username)?;
    let user = store.create_user(&username).await?;
    store.create_collection(user.id, FIRST_COLLECTION_NAME).await?;
    let secret = secret::issue_secret(store, user.id).await?;
    tracing::info!(%username, "user provisioned");
    Ok(Provisioned { user, secret })
}

/// Revoke every edit secret of an existing user and issue a fresh one.
/// Previously shared edit links stop working.
///
/// # Errors
///
/// `UnknownUser` if no such user exists, or a store error.
pub async fn rotate_secret(store: &dyn FrameStore, username: &str) -> Result<Provisioned, AccountError> {
    let user = store
        .find_user_by_username(&page::normalize_username(username))
        .await?
        .ok_or_else(|| AccountError::UnknownUser(username.to_owned()))?;
    let revoked = store.revoke_secrets(user.id).await?;
    let secret = secret::issue_secret(store, user.id).await?;
    tracing::info!(username = %user.username, revoked, "edit secret rotated");
    Ok(Provisioned { user, secret })
}

/// Absolute edit link for a user.
#[must_use]
pub fn edit_link(base_url: &str, username: &str, secret: &str) -> String {
    format!(
        "{}/{}?secret={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(username),
        urlencoding::encode(secret)
    )
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
