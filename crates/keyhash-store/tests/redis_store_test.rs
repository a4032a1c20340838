//! Integration tests against a live Redis server.
//!
//! Ignored by default. Run with a server available:
//!
//! ```text
//! KEYHASH_TEST_REDIS_URL=redis://127.0.0.1:6379 cargo test -p keyhash-store -- --ignored
//! ```

use keyhash_config::StoreConfig;
use keyhash_core::{FieldValue, HashObject};
use keyhash_store::{ObjectStore, RedisStoreClient, StoreClient, StoreOptions};
use serde_json::json;
use std::sync::Arc;

fn test_config() -> StoreConfig {
    let url = std::env::var("KEYHASH_TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    StoreConfig {
        url: Some(url),
        ..StoreConfig::default()
    }
}

fn unique_key(name: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("keyhash-test:{}:{}", name, nanos)
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_ping() {
    let client = RedisStoreClient::new(&test_config()).unwrap();
    client.ping().await.unwrap();
    assert!(client.is_connected());
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_object_round_trip_with_ttl() {
    let client = Arc::new(RedisStoreClient::new(&test_config()).unwrap());
    let store = ObjectStore::new(client.clone());
    let key = unique_key("object");

    let mut object = HashObject::new();
    object.insert("name".into(), "Ada".into());
    object.insert("empty".into(), "".into());
    object.insert("prefs".into(), FieldValue::Structured(json!({"theme": "dark"})));

    store
        .store_object(key.as_str(), &object, StoreOptions::with_ttl(30))
        .await
        .unwrap();

    assert_eq!(store.fetch_object(key.as_str()).await.unwrap(), object);

    let raw = client.hash_get_all(&key).await.unwrap();
    assert!(raw.contains_key("prefs!"));

    store.destroy_object(key.as_str()).await.unwrap();
    assert!(store.fetch_object(key.as_str()).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_scalar_round_trip() {
    let store = ObjectStore::from_config(&test_config()).unwrap();
    let key = unique_key("scalar");

    assert_eq!(store.fetch::<serde_json::Value>(key.as_str()).await.unwrap(), None);

    store.store(key.as_str(), &json!([1, "two", null])).await.unwrap();
    store.expire(key.as_str(), 30).await.unwrap();
    assert_eq!(
        store.fetch::<serde_json::Value>(key.as_str()).await.unwrap(),
        Some(json!([1, "two", null]))
    );

    store.destroy_object(key.as_str()).await.unwrap();
}
