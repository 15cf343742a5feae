//! Postgres-backed `FrameStore`.

use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{CollectionRow, FrameData, FramePatch, FrameRow, FrameStore, StoreError, UserRow};

const FRAME_COLUMNS: &str = "id, collection_id, x, y, width, height, url, props, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(r: &PgRow) -> UserRow {
    UserRow { id: r.get("id"), username: r.get("username"), created_at: r.get("created_at") }
}

fn collection_from_row(r: &PgRow) -> CollectionRow {
    CollectionRow { id: r.get("id"), user_id: r.get("user_id"), name: r.get("name"), created_at: r.get("created_at") }
}

fn frame_from_row(r: &PgRow) -> FrameRow {
    FrameRow {
        id: r.get("id"),
        collection_id: r.get("collection_id"),
        x: r.get("x"),
        y: r.get("y"),
        width: r.get("width"),
        height: r.get("height"),
        url: r.get("url"),
        props: r.get("props"),
        created_at: r.get("created_at"),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait::async_trait]
impl FrameStore for PgStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        let row = sqlx::query("SELECT id, username, created_at FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn create_user(&self, username: &str) -> Result<UserRow, StoreError> {
        let row = sqlx::query("INSERT INTO users (username) VALUES ($1) RETURNING id, username, created_at")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!("username {username}"))
                } else {
                    StoreError::Database(e)
                }
            })?;
        Ok(user_from_row(&row))
    }

    async fn list_collections(&self, user_id: Uuid) -> Result<Vec<CollectionRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, created_at
             FROM collections
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(collection_from_row).collect())
    }

    async fn find_collection(&self, user_id: Uuid, collection_id: Uuid) -> Result<Option<CollectionRow>, StoreError> {
        let row = sqlx::query("SELECT id, user_id, name, created_at FROM collections WHERE id = $1 AND user_id = $2")
            .bind(collection_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(collection_from_row))
    }

    async fn first_collection(&self, user_id: Uuid) -> Result<Option<CollectionRow>, StoreError> {
        let row = sqlx::query(
            "SELECT id, user_id, name, created_at
             FROM collections
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(collection_from_row))
    }

    async fn create_collection(&self, user_id: Uuid, name: &str) -> Result<CollectionRow, StoreError> {
        let row = sqlx::query(
            "INSERT INTO collections (user_id, name) VALUES ($1, $2)
             RETURNING id, user_id, name, created_at",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(collection_from_row(&row))
    }

    async fn list_frames(&self, collection_id: Uuid) -> Result<Vec<FrameRow>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {FRAME_COLUMNS}
             FROM frames
             WHERE collection_id = $1
             ORDER BY y ASC, x ASC, created_at ASC, id ASC"
        ))
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(frame_from_row).collect())
    }

    async fn create_frame(&self, collection_id: Uuid, data: &FrameData) -> Result<FrameRow, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO frames (collection_id, x, y, width, height, url, props)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {FRAME_COLUMNS}"
        ))
        .bind(collection_id)
        .bind(data.x)
        .bind(data.y)
        .bind(data.width)
        .bind(data.height)
        .bind(&data.url)
        .bind(Value::Object(data.props.clone()))
        .fetch_one(&self.pool)
        .await?;
        Ok(frame_from_row(&row))
    }

    async fn update_frame(
        &self,
        owner_id: Uuid,
        frame_id: Uuid,
        patch: &FramePatch,
    ) -> Result<Option<FrameRow>, StoreError> {
        let row = sqlx::query(
            "UPDATE frames f
             SET x = COALESCE($3, f.x),
                 y = COALESCE($4, f.y),
                 width = COALESCE($5, f.width),
                 height = COALESCE($6, f.height),
                 url = COALESCE($7, f.url),
                 props = f.props || $8
             FROM collections c
             WHERE f.id = $1 AND f.collection_id = c.id AND c.user_id = $2
             RETURNING f.id, f.collection_id, f.x, f.y, f.width, f.height, f.url, f.props, f.created_at",
        )
        .bind(frame_id)
        .bind(owner_id)
        .bind(patch.x)
        .bind(patch.y)
        .bind(patch.width)
        .bind(patch.height)
        .bind(patch.url.as_deref())
        .bind(Value::Object(patch.props.clone()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(frame_from_row))
    }

    async fn delete_frame(&self, owner_id: Uuid, frame_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let row = sqlx::query(
            "DELETE FROM frames f
             USING collections c
             WHERE f.id = $1 AND f.collection_id = c.id AND c.user_id = $2
             RETURNING f.collection_id",
        )
        .bind(frame_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.get("collection_id")))
    }

    async fn insert_secret(&self, user_id: Uuid, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO edit_secrets (token_hash, user_id) VALUES ($1, $2)")
            .bind(token_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_secret_owner(&self, token_hash: &str) -> Result<Option<Uuid>, StoreError> {
        let row = sqlx::query("SELECT user_id FROM edit_secrets WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("user_id")))
    }

    async fn revoke_secrets(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM edit_secrets WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
