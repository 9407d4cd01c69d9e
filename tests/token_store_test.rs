use matrix_rust::store::{FileTokenStore, MemoryTokenStore, TokenStore};

#[tokio::test]
async fn test_memory_store_roundtrip() {
    let store = MemoryTokenStore::new();

    assert_eq!(store.access_token("@alice:example.org").await.unwrap(), None);

    store
        .set_access_token("@alice:example.org", "syt_alice")
        .await
        .unwrap();
    assert_eq!(
        store.access_token("@alice:example.org").await.unwrap(),
        Some("syt_alice".to_string())
    );

    store.remove_all_access_tokens().await.unwrap();
    assert_eq!(store.access_token("@alice:example.org").await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_roundtrip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileTokenStore::new(dir.path())
        .await
        .expect("Failed to create file store");

    store
        .set_access_token("@alice:example.org", "syt_alice")
        .await
        .unwrap();
    store
        .set_access_token("@bob:example.org", "syt_bob")
        .await
        .unwrap();

    assert_eq!(
        store.access_token("@alice:example.org").await.unwrap(),
        Some("syt_alice".to_string())
    );
    assert_eq!(store.access_token("@carol:example.org").await.unwrap(), None);

    // Listing reports the original usernames, not the sanitized filenames.
    let mut tokens = store.access_tokens().await.unwrap();
    tokens.sort_by(|a, b| a.username.cmp(&b.username));
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].username, "@alice:example.org");
    assert_eq!(tokens[0].access_token, "syt_alice");
    assert_eq!(tokens[1].username, "@bob:example.org");
}

#[tokio::test]
async fn test_file_store_overwrites_existing_token() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileTokenStore::new(dir.path())
        .await
        .expect("Failed to create file store");

    store
        .set_access_token("@alice:example.org", "syt_old")
        .await
        .unwrap();
    store
        .set_access_token("@alice:example.org", "syt_new")
        .await
        .unwrap();

    assert_eq!(
        store.access_token("@alice:example.org").await.unwrap(),
        Some("syt_new".to_string())
    );
    assert_eq!(store.access_tokens().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_store_remove_all() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileTokenStore::new(dir.path())
        .await
        .expect("Failed to create file store");

    store
        .set_access_token("@alice:example.org", "syt_alice")
        .await
        .unwrap();
    store.remove_all_access_tokens().await.unwrap();

    assert!(store.access_tokens().await.unwrap().is_empty());
    assert_eq!(store.access_token("@alice:example.org").await.unwrap(), None);

    // A reopened store over the same directory sees the cleared state.
    let reopened = FileTokenStore::new(dir.path())
        .await
        .expect("Failed to reopen file store");
    assert!(reopened.access_tokens().await.unwrap().is_empty());
}
