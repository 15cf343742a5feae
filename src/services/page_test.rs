use super::*;
use crate::state::test_helpers;

#[test]
fn normalize_username_lowercases_and_trims() {
    assert_eq!(normalize_username("  Alice "), "alice");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let fx = test_helpers::fixture().await;
    let err = load_page(fx.store.as_ref(), "nobody", None, None).await.unwrap_err();
    assert!(matches!(err, PageError::NotFound(USER_NOT_FOUND)));
}

#[tokio::test]
async fn username_lookup_is_case_insensitive() {
    let fx = test_helpers::fixture().await;
    let page = load_page(fx.store.as_ref(), "ALICE", None, None).await.unwrap();
    assert_eq!(page.user.username, "alice");
}

#[tokio::test]
async fn defaults_to_first_collection_by_creation_order() {
    let fx = test_helpers::fixture().await;
    fx.store.create_collection(fx.user.id, "Later").await.unwrap();

    let page = load_page(fx.store.as_ref(), "alice", None, None).await.unwrap();
    assert_eq!(page.collection.id, fx.collection.id);
    assert_eq!(page.collections.len(), 2);
    assert_eq!(page.collections[0].name, "Favorites");
    assert_eq!(page.collections[1].name, "Later");
}

#[tokio::test]
async fn selects_requested_collection() {
    let fx = test_helpers::fixture().await;
    let other = fx.store.create_collection(fx.user.id, "Travel").await.unwrap();

    let id = other.id.to_string();
    let page = load_page(fx.store.as_ref(), "alice", Some(id.as_str()), None).await.unwrap();
    assert_eq!(page.collection.id, other.id);
    assert_eq!(page.collection.name, "Travel");
}

#[tokio::test]
async fn user_without_collections_is_collection_not_found() {
    let fx = test_helpers::fixture().await;
    fx.store.create_user("bob").await.unwrap();

    let err = load_page(fx.store.as_ref(), "bob", None, None).await.unwrap_err();
    assert!(matches!(err, PageError::NotFound(COLLECTION_NOT_FOUND)));
}

#[tokio::test]
async fn foreign_or_malformed_collection_id_is_not_found() {
    let fx = test_helpers::fixture().await;
    let bob = fx.store.create_user("bob").await.unwrap();
    let bobs = fx.store.create_collection(bob.id, "Bob's").await.unwrap();

    let foreign = bobs.id.to_string();
    let err = load_page(fx.store.as_ref(), "alice", Some(foreign.as_str()), None).await.unwrap_err();
    assert!(matches!(err, PageError::NotFound(COLLECTION_NOT_FOUND)));

    let err = load_page(fx.store.as_ref(), "alice", Some("not-a-uuid"), None).await.unwrap_err();
    assert!(matches!(err, PageError::NotFound(COLLECTION_NOT_FOUND)));
}

#[tokio::test]
async fn frames_are_ordered_by_row_then_column() {
    let fx = test_helpers::fixture().await;
    let c = fx.add_frame(2, 1, 1, 1).await;
    let a = fx.add_frame(0, 0, 1, 1).await;
    let b = fx.add_frame(1, 0, 1, 1).await;

    let page = load_page(fx.store.as_ref(), "alice", None, None).await.unwrap();
    let ids: Vec<Uuid> = page.collection.frames.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn valid_secret_enables_edit_mode() {
    let fx = test_helpers::fixture().await;

    let page = load_page(fx.store.as_ref(), "alice", None, Some(fx.secret.as_str())).await.unwrap();
    assert!(page.can_edit);

    let page = load_page(fx.store.as_ref(), "alice", None, Some("wrong")).await.unwrap();
    assert!(!page.can_edit);

    let page = load_page(fx.store.as_ref(), "alice", None, None).await.unwrap();
    assert!(!page.can_edit);
}

#[tokio::test]
async fn serialized_page_never_exposes_owner_ids() {
    let fx = test_helpers::fixture().await;
    fx.add_frame(0, 0, 2, 1).await;

    let page = load_page(fx.store.as_ref(), "alice", None, Some(fx.secret.as_str())).await.unwrap();
    let json = serde_json::to_string(&page).unwrap();

    assert!(!json.contains("userId"));
    assert!(!json.contains("user_id"));
    assert!(!json.contains(&fx.user.id.to_string()));
    assert!(!json.contains("can_edit"));
    assert!(json.contains(&fx.collection.id.to_string()));
}

#[tokio::test]
async fn first_run_only_for_single_empty_collection() {
    let fx = test_helpers::fixture().await;
    let page = load_page(fx.store.as_ref(), "alice", None, None).await.unwrap();
    assert!(page.is_first_run());

    fx.store.create_collection(fx.user.id, "Second").await.unwrap();
    let page = load_page(fx.store.as_ref(), "alice", None, None).await.unwrap();
    assert!(!page.is_first_run());
}
