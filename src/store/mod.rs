//! Data store seam for users, collections, frames and edit secrets.
//!
//! DESIGN
//! ======
//! Route handlers and services only see the `FrameStore` trait. Production
//! wires in `PgStore`; tests use the in-memory `MemoryStore` so loader and
//! action behavior can be exercised without a live database.
//!
//! ORDERING
//! ========
//! Collections are listed by `created_at ASC, id ASC`; the first entry is the
//! user's default collection. Frames are listed by `y, x, created_at, id`.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

pub use postgres::PgStore;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("already exists: {0}")]
    Conflict(String),
}

impl crate::error::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "E_DATABASE",
            Self::Conflict(_) => "E_CONFLICT",
        }
    }
}

/// Row from the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: Uuid,
    /// Always stored lowercase.
    pub username: String,
    pub created_at: OffsetDateTime,
}

/// Row from the `collections` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// Row from the `frames` table.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Image or content reference. Empty when the frame carries only props.
    pub url: String,
    /// Additional payload fields submitted with the frame.
    pub props: Value,
    pub created_at: OffsetDateTime,
}

/// Writable frame fields, shared by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub url: String,
    pub props: Map<String, Value>,
}

impl Default for FrameData {
    fn default() -> Self {
        Self { x: 0, y: 0, width: 1, height: 1, url: String::new(), props: Map::new() }
    }
}

/// Partial frame update. `None` fields keep their stored value; `props`
/// keys are merged over the stored props.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub url: Option<String>,
    pub props: Map<String, Value>,
}

impl FramePatch {
    /// Apply this patch to a stored frame in place.
    pub fn apply_to(&self, frame: &mut FrameRow) {
        if let Some(x) = self.x {
            frame.x = x;
        }
        if let Some(y) = self.y {
            frame.y = y;
        }
        if let Some(width) = self.width {
            frame.width = width;
        }
        if let Some(height) = self.height {
            frame.height = height;
        }
        if let Some(url) = &self.url {
            frame.url.clone_from(url);
        }
        if !self.props.is_empty() {
            let mut merged = match &frame.props {
                Value::Object(existing) => existing.clone(),
                _ => Map::new(),
            };
            merged.extend(self.props.clone());
            frame.props = Value::Object(merged);
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Persistence operations used by the page loader, the mutation handler and
/// the admin CLI. Every method is a single read or a single write.
#[async_trait::async_trait]
pub trait FrameStore: Send + Sync {
    /// Look up a user by lowercase username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError>;

    /// Create a user. Fails with `Conflict` if the username is taken.
    async fn create_user(&self, username: &str) -> Result<UserRow, StoreError>;

    /// All collections owned by `user_id`, in default order.
    async fn list_collections(&self, user_id: Uuid) -> Result<Vec<CollectionRow>, StoreError>;

    /// A collection by id, only if owned by `user_id`.
    async fn find_collection(&self, user_id: Uuid, collection_id: Uuid) -> Result<Option<CollectionRow>, StoreError>;

    /// The first collection of `user_id` in default order.
    async fn first_collection(&self, user_id: Uuid) -> Result<Option<CollectionRow>, StoreError>;

    async fn create_collection(&self, user_id: Uuid, name: &str) -> Result<CollectionRow, StoreError>;

    /// Frames of a collection, in default order.
    async fn list_frames(&self, collection_id: Uuid) -> Result<Vec<FrameRow>, StoreError>;

    async fn create_frame(&self, collection_id: Uuid, data: &FrameData) -> Result<FrameRow, StoreError>;

    /// Patch a frame that lives in one of `owner_id`'s collections.
    /// Returns `None` if no such frame exists in that scope.
    async fn update_frame(&self, owner_id: Uuid, frame_id: Uuid, patch: &FramePatch)
    -> Result<Option<FrameRow>, StoreError>;

    /// Delete a frame that lives in one of `owner_id`'s collections,
    /// returning the collection it belonged to. `None` if no such frame
    /// exists in that scope.
    async fn delete_frame(&self, owner_id: Uuid, frame_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    /// Persist the hash of a newly issued edit secret.
    async fn insert_secret(&self, user_id: Uuid, token_hash: &str) -> Result<(), StoreError>;

    /// Resolve an edit-secret hash to the owning user id.
    async fn find_secret_owner(&self, token_hash: &str) -> Result<Option<Uuid>, StoreError>;

    /// Revoke every edit secret of `user_id`. Returns how many were removed.
    async fn revoke_secrets(&self, user_id: Uuid) -> Result<u64, StoreError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
