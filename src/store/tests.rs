use super::*;
use crate::error::StorageError;

fn sample_memory(id: &str, timestamp: i64) -> Memory {
    Memory {
        id: id.to_string(),
        image: "data:image/png;base64,aGVsbG8=".to_string(),
        caption: "golden hour forever".to_string(),
        reflection: Some("we stayed until the light left".to_string()),
        mood: Some(Mood::Nostalgic),
        is_favorite: false,
        timestamp,
    }
}

#[tokio::test]
async fn test_save_load_round_trip_is_lossless() {
    let store = MemoryStore::open_in_memory().unwrap();
    let memory = sample_memory("m1", 1000);

    store.save_all(vec![memory.clone()]).await.unwrap();
    let loaded = store.load_all().await.unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], memory);
}

#[tokio::test]
async fn test_load_from_fresh_store_is_empty_not_an_error() {
    let store = MemoryStore::open_in_memory().unwrap();
    let loaded = store.load_all().await.unwrap();
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_load_all_orders_newest_first() {
    let store = MemoryStore::open_in_memory().unwrap();
    store
        .save_all(vec![
            sample_memory("a", 100),
            sample_memory("b", 300),
            sample_memory("c", 200),
        ])
        .await
        .unwrap();

    let loaded = store.load_all().await.unwrap();
    let timestamps: Vec<i64> = loaded.iter().map(|m| m.timestamp).collect();
    assert_eq!(timestamps, vec![300, 200, 100]);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = MemoryStore::open_in_memory().unwrap();
    store.save_all(vec![sample_memory("m1", 100)]).await.unwrap();

    store.delete_one("m1").await.unwrap();
    // Second delete of the same id is a tolerated no-op
    store.delete_one("m1").await.unwrap();

    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_changes_only_patched_fields() {
    let store = MemoryStore::open_in_memory().unwrap();
    let original = sample_memory("m1", 100);
    store.save_all(vec![original.clone()]).await.unwrap();

    let updated = store
        .update_fields("m1", MemoryPatch::favorite(true))
        .await
        .unwrap();

    assert!(updated.is_favorite);
    assert_eq!(updated.image, original.image);
    assert_eq!(updated.caption, original.caption);
    assert_eq!(updated.reflection, original.reflection);
    assert_eq!(updated.mood, original.mood);
    assert_eq!(updated.timestamp, original.timestamp);

    // The stored row agrees with the returned record
    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded[0], updated);
}

#[tokio::test]
async fn test_update_missing_id_fails_loudly() {
    let store = MemoryStore::open_in_memory().unwrap();
    let result = store
        .update_fields("ghost", MemoryPatch::favorite(true))
        .await;

    assert!(matches!(
        result,
        Err(crate::error::BoothError::Storage(
            StorageError::NotFound { .. }
        ))
    ));
}

#[tokio::test]
async fn test_save_stamps_missing_timestamps() {
    let store = MemoryStore::open_in_memory().unwrap();
    let mut memory = sample_memory("m1", 0);
    memory.timestamp = 0;

    store.save_all(vec![memory]).await.unwrap();
    let loaded = store.load_all().await.unwrap();
    assert!(loaded[0].timestamp > 0);
}

#[tokio::test]
async fn test_batch_upsert_is_last_writer_wins() {
    let store = MemoryStore::open_in_memory().unwrap();
    let mut first = sample_memory("m1", 100);
    first.caption = "first".to_string();
    let mut second = sample_memory("m1", 100);
    second.caption = "second".to_string();

    store.save_all(vec![first]).await.unwrap();
    store.save_all(vec![second]).await.unwrap();

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].caption, "second");
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memories.db");

    {
        let store = MemoryStore::open(&path).unwrap();
        store.save_all(vec![sample_memory("m1", 100)]).await.unwrap();
    }

    let reopened = MemoryStore::open(&path).unwrap();
    let loaded = reopened.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "m1");
}

#[tokio::test]
async fn test_memory_new_generates_unique_ids_and_default_caption() {
    let a = Memory::new("data:image/png;base64,QQ==".to_string(), "");
    let b = Memory::new("data:image/png;base64,QQ==".to_string(), "  ");

    assert_ne!(a.id, b.id);
    assert_eq!(a.caption, DEFAULT_CAPTION);
    assert_eq!(b.caption, DEFAULT_CAPTION);
    assert!(a.timestamp > 0);
    assert!(!a.is_favorite);
}

#[tokio::test]
async fn test_concurrent_saves_do_not_corrupt_the_store() {
    let store = MemoryStore::open_in_memory().unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .save_all(vec![sample_memory(&format!("m{}", i), 100 + i as i64)])
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 8);
}
