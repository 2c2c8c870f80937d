use premia_rust::store::{UserPatch, UserStore};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_file_database_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("users.db");

    let store = UserStore::new(&db_path.to_string_lossy()).await.unwrap();

    let user = store
        .create("Jane Doe", "janedoe@example.com", Some(28))
        .await
        .unwrap();

    let fetched = store.get(user.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Jane Doe");
    assert_eq!(fetched.email, "janedoe@example.com");
    assert_eq!(fetched.age, Some(28));
    assert_eq!(fetched.created_at, user.created_at);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("users.db");
    let db_path_str = db_path.to_string_lossy().to_string();

    let user_id = {
        let store = UserStore::new(&db_path_str).await.unwrap();
        store
            .create("Persisted", "persisted@example.com", None)
            .await
            .unwrap()
            .id
    };

    let reopened = UserStore::new(&db_path_str).await.unwrap();
    let user = reopened.get(user_id).await.unwrap().unwrap();
    assert_eq!(user.email, "persisted@example.com");
}

#[tokio::test]
async fn test_users_are_independent() {
    let store = UserStore::new(":memory:").await.unwrap();

    let first = store
        .create("First", "first@example.com", Some(30))
        .await
        .unwrap();
    let second = store
        .create("Second", "second@example.com", Some(40))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    store.delete(first.id).await.unwrap();

    assert!(store.get(first.id).await.unwrap().is_none());
    let survivor = store.get(second.id).await.unwrap().unwrap();
    assert_eq!(survivor.name, "Second");
}

#[tokio::test]
async fn test_update_each_field_independently() {
    let store = UserStore::new(":memory:").await.unwrap();
    let user = store
        .create("Jane Doe", "janedoe@example.com", Some(28))
        .await
        .unwrap();

    let updated = store
        .update(
            user.id,
            UserPatch {
                email: Some("jane.doe@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Jane Doe");
    assert_eq!(updated.email, "jane.doe@example.com");
    assert_eq!(updated.age, Some(28));

    let updated = store
        .update(
            user.id,
            UserPatch {
                name: Some("Jane Smith".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Jane Smith");
    assert_eq!(updated.email, "jane.doe@example.com");
}

#[tokio::test]
async fn test_concurrent_creates() {
    let store = Arc::new(UserStore::new(":memory:").await.unwrap());

    let mut handles = vec![];
    for i in 0..10u32 {
        let store_clone = Arc::clone(&store);
        let handle = tokio::spawn(async move {
            store_clone
                .create(
                    &format!("User {}", i),
                    &format!("user{}@example.com", i),
                    Some(20 + i),
                )
                .await
        });
        handles.push(handle);
    }

    let mut ids = vec![];
    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        ids.push(user.id);
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);

    for id in ids {
        assert!(store.get(id).await.unwrap().is_some());
    }
}
