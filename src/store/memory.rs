//! In-memory `FrameStore` used by unit and router tests.

use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CollectionRow, FrameData, FramePatch, FrameRow, FrameStore, StoreError, UserRow};

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    collections: Vec<CollectionRow>,
    frames: Vec<FrameRow>,
    secrets: HashMap<String, Uuid>,
    last_created_at: Option<OffsetDateTime>,
}

impl Tables {
    /// Strictly increasing timestamps so default ordering follows insertion.
    fn next_created_at(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }

    fn owns_collection(&self, owner_id: Uuid, collection_id: Uuid) -> bool {
        self.collections
            .iter()
            .any(|c| c.id == collection_id && c.user_id == owner_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a frame by id regardless of owner. Test inspection only.
    pub async fn frame(&self, frame_id: Uuid) -> Option<FrameRow> {
        let tables = self.tables.read().await;
        tables.frames.iter().find(|f| f.id == frame_id).cloned()
    }

    pub async fn frame_count(&self) -> usize {
        self.tables.read().await.frames.len()
    }

    pub async fn collection_count(&self) -> usize {
        self.tables.read().await.collections.len()
    }
}

#[async_trait::async_trait]
impl FrameStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, username: &str) -> Result<UserRow, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict(format!("username {username}")));
        }
        let created_at = tables.next_created_at();
        let row = UserRow { id: Uuid::new_v4(), username: username.to_owned(), created_at };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn list_collections(&self, user_id: Uuid) -> Result<Vec<CollectionRow>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<CollectionRow> = tables
            .collections
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(rows)
    }

    async fn find_collection(&self, user_id: Uuid, collection_id: Uuid) -> Result<Option<CollectionRow>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .collections
            .iter()
            .find(|c| c.id == collection_id && c.user_id == user_id)
            .cloned())
    }

    async fn first_collection(&self, user_id: Uuid) -> Result<Option<CollectionRow>, StoreError> {
        Ok(self.list_collections(user_id).await?.into_iter().next())
    }

    async fn create_collection(&self, user_id: Uuid, name: &str) -> Result<CollectionRow, StoreError> {
        let mut tables = self.tables.write().await;
        let created_at = tables.next_created_at();
        let row = CollectionRow { id: Uuid::new_v4(), user_id, name: name.to_owned(), created_at };
        tables.collections.push(row.clone());
        Ok(row)
    }

    async fn list_frames(&self, collection_id: Uuid) -> Result<Vec<FrameRow>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<FrameRow> = tables
            .frames
            .iter()
            .filter(|f| f.collection_id == collection_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.y, a.x, a.created_at, a.id).cmp(&(b.y, b.x, b.created_at, b.id)));
        Ok(rows)
    }

    async fn create_frame(&self, collection_id: Uuid, data: &FrameData) -> Result<FrameRow, StoreError> {
        let mut tables = self.tables.write().await;
        let created_at = tables.next_created_at();
        let row = FrameRow {
            id: Uuid::new_v4(),
            collection_id,
            x: data.x,
            y: data.y,
            width: data.width,
            height: data.height,
            url: data.url.clone(),
            props: serde_json::Value::Object(data.props.clone()),
            created_at,
        };
        tables.frames.push(row.clone());
        Ok(row)
    }

    async fn update_frame(
        &self,
        owner_id: Uuid,
        frame_id: Uuid,
        patch: &FramePatch,
    ) -> Result<Option<FrameRow>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables.frames.iter().position(|f| f.id == frame_id) else {
            return Ok(None);
        };
        if !tables.owns_collection(owner_id, tables.frames[idx].collection_id) {
            return Ok(None);
        }
        let frame = &mut tables.frames[idx];
        patch.apply_to(frame);
        Ok(Some(frame.clone()))
    }

    async fn delete_frame(&self, owner_id: Uuid, frame_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables.frames.iter().position(|f| f.id == frame_id) else {
            return Ok(None);
        };
        if !tables.owns_collection(owner_id, tables.frames[idx].collection_id) {
            return Ok(None);
        }
        Ok(Some(tables.frames.remove(idx).collection_id))
    }

    async fn insert_secret(&self, user_id: Uuid, token_hash: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.secrets.insert(token_hash.to_owned(), user_id);
        Ok(())
    }

    async fn find_secret_owner(&self, token_hash: &str) -> Result<Option<Uuid>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.secrets.get(token_hash).copied())
    }

    async fn revoke_secrets(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.secrets.len();
        tables.secrets.retain(|_, owner| *owner != user_id);
        Ok((before - tables.secrets.len()) as u64)
    }
}
