//! View loader — resolves the user, the selected collection and its frames.
//!
//! DESIGN
//! ======
//! The view types below are the only shapes that leave this module. They
//! carry no user id and no `user_id` foreign keys, so redaction holds for
//! every serializer and renderer that consumes them.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{COLLECTION_NOT_FOUND, PageError, USER_NOT_FOUND};
use crate::services::secret;
use crate::store::{CollectionRow, FrameRow, FrameStore, UserRow};

// =============================================================================
// VIEW TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub url: String,
    pub props: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionView {
    pub id: Uuid,
    pub name: String,
    pub frames: Vec<FrameView>,
}

/// Everything the page needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageData {
    pub user: PublicUser,
    pub collection: CollectionView,
    pub collections: Vec<CollectionSummary>,
    /// True when the presented secret belongs to this user.
    #[serde(skip)]
    pub can_edit: bool,
}

impl PageData {
    /// The first-run state: an empty collection that is also the only one.
    #[must_use]
    pub fn is_first_run(&self) -> bool {
        self.collection.frames.is_empty() && self.collections.len() == 1
    }
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        Self { username: row.username, created_at: row.created_at }
    }
}

impl From<&CollectionRow> for CollectionSummary {
    fn from(row: &CollectionRow) -> Self {
        Self { id: row.id, name: row.name.clone() }
    }
}

impl From<FrameRow> for FrameView {
    fn from(row: FrameRow) -> Self {
        Self {
            id: row.id,
            collection_id: row.collection_id,
            x: row.x,
            y: row.y,
            width: row.width,
            height: row.height,
            url: row.url,
            props: row.props,
        }
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Normalize a username path segment for lookup.
#[must_use]
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Resolve a user by case-insensitive username.
///
/// # Errors
///
/// `NotFound` if no such user exists, or a store error.
pub async fn resolve_user(store: &dyn FrameStore, username: &str) -> Result<UserRow, PageError> {
    store
        .find_user_by_username(&normalize_username(username))
        .await?
        .ok_or(PageError::NotFound(USER_NOT_FOUND))
}

/// Load page data for `username`.
///
/// `collection_id` selects a collection; when absent the user's first
/// collection is used. `presented_secret` enables edit mode if it verifies.
///
/// # Errors
///
/// `NotFound` if the user or collection is absent, or a store error.
pub async fn load_page(
    store: &dyn FrameStore,
    username: &str,
    collection_id: Option<&str>,
    presented_secret: Option<&str>,
) -> Result<PageData, PageError> {
    let user = resolve_user(store, username).await?;

    let collection = match collection_id.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => store.find_collection(user.id, id).await?,
            Err(_) => None,
        },
        None => store.first_collection(user.id).await?,
    }
    .ok_or(PageError::NotFound(COLLECTION_NOT_FOUND))?;

    let collections = store.list_collections(user.id).await?;
    let frames = store.list_frames(collection.id).await?;

    let can_edit = match presented_secret {
        Some(secret) => secret::verify_secret(store, user.id, secret).await?,
        None => false,
    };

    tracing::debug!(
        username = %user.username,
        collection_id = %collection.id,
        frames = frames.len(),
        can_edit,
        "page loaded"
    );

    Ok(PageData {
        user: user.into(),
        collection: CollectionView {
            id: collection.id,
            name: collection.name,
            frames: frames.into_iter().map(FrameView::from).collect(),
        },
        collections: collections.iter().map(CollectionSummary::from).collect(),
        can_edit,
    })
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
