//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the data store behind the `FrameStore` trait and nothing mutable of
//! its own; every request is served independently.

use std::sync::Arc;

use crate::store::FrameStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the store is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FrameStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn FrameStore>) -> Self {
        Self { store }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::services::secret;
    use crate::store::memory::MemoryStore;
    use crate::store::{CollectionRow, FrameData, FrameRow, UserRow};

    /// A seeded in-memory world: user `alice` with one collection and a
    /// live edit secret.
    pub struct Fixture {
        pub store: Arc<MemoryStore>,
        pub state: AppState,
        pub user: UserRow,
        pub collection: CollectionRow,
        pub secret: String,
    }

    impl Fixture {
        /// Insert a frame into the fixture's collection.
        pub async fn add_frame(&self, x: i32, y: i32, width: i32, height: i32) -> FrameRow {
            let data = FrameData { x, y, width, height, url: format!("https://img.test/{x}-{y}.png"), ..FrameData::default() };
            self.store
                .create_frame(self.collection.id, &data)
                .await
                .expect("create_frame should succeed")
        }
    }

    pub async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let user = store.create_user("alice").await.expect("create_user should succeed");
        let collection = store
            .create_collection(user.id, "Favorites")
            .await
            .expect("create_collection should succeed");
        let secret = secret::issue_secret(store.as_ref(), user.id)
            .await
            .expect("issue_secret should succeed");
        let state = AppState::new(store.clone());
        Fixture { store, state, user, collection, secret }
    }
}
