//! Integration tests for the SQLite store: round-trips against both the
//! in-memory database and a real file on disk.

use skillforge_store::{KeyValueStore, SqliteStore, StoreConfig, keys};

#[tokio::test]
async fn in_memory_round_trip() {
    let store = SqliteStore::connect_in_memory().await.unwrap();

    assert!(store.get(keys::TRAINING_PLAN).await.unwrap().is_none());

    store.set(keys::TRAINING_PLAN, "# plan").await.unwrap();
    assert_eq!(
        store.get(keys::TRAINING_PLAN).await.unwrap().as_deref(),
        Some("# plan")
    );

    store.remove(keys::TRAINING_PLAN).await.unwrap();
    assert!(store.get(keys::TRAINING_PLAN).await.unwrap().is_none());
}

#[tokio::test]
async fn set_replaces_existing_value() {
    let store = SqliteStore::connect_in_memory().await.unwrap();

    store.set(keys::PLAN_HISTORY, "[]").await.unwrap();
    store.set(keys::PLAN_HISTORY, "[{\"n\":1}]").await.unwrap();

    assert_eq!(
        store.get(keys::PLAN_HISTORY).await.unwrap().as_deref(),
        Some("[{\"n\":1}]")
    );
}

#[tokio::test]
async fn file_store_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("nested").join("test.db"));

    {
        let store = SqliteStore::connect(&config).await.unwrap();
        store.set(keys::UPLOADED_DOCUMENTS, "[]").await.unwrap();
        store.close().await;
    }

    let store = SqliteStore::connect(&config).await.unwrap();
    assert_eq!(
        store.get(keys::UPLOADED_DOCUMENTS).await.unwrap().as_deref(),
        Some("[]")
    );
    store.close().await;
}

#[tokio::test]
async fn keys_are_independent() {
    let store = SqliteStore::connect_in_memory().await.unwrap();

    store.set(keys::TRAINING_PLAN, "plan").await.unwrap();
    store.set(keys::EVALUATION_HISTORY, "evals").await.unwrap();
    store.remove(keys::TRAINING_PLAN).await.unwrap();

    assert!(store.get(keys::TRAINING_PLAN).await.unwrap().is_none());
    assert_eq!(
        store.get(keys::EVALUATION_HISTORY).await.unwrap().as_deref(),
        Some("evals")
    );
}
