//! Store client boundary.

use async_trait::async_trait;
use keyhash_core::{EncodedHashObject, Interface, KeyHashResult};

/// A connected session to a key/value + hash store.
///
/// Keys arrive already resolved to their flat form and values already
/// encoded. Implementations own connection handling and report their own
/// failures as [`keyhash_core::KeyHashError::Store`].
#[async_trait]
pub trait StoreClient: Interface + Send + Sync {
    /// Get the string value of a key; `None` if the key does not exist.
    async fn get(&self, key: &str) -> KeyHashResult<Option<String>>;

    /// Set the string value of a key, clearing any TTL.
    async fn set(&self, key: &str, value: &str) -> KeyHashResult<()>;

    /// Delete a key, returning the number of keys removed.
    async fn delete(&self, key: &str) -> KeyHashResult<u64>;

    /// Set a key's time-to-live in seconds.
    ///
    /// Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, seconds: u64) -> KeyHashResult<bool>;

    /// Get every field of a hash; empty if the key does not exist.
    async fn hash_get_all(&self, key: &str) -> KeyHashResult<EncodedHashObject>;

    /// Set several hash fields at once, keeping fields not mentioned.
    async fn hash_set_multiple(&self, key: &str, fields: &EncodedHashObject) -> KeyHashResult<()>;
}
