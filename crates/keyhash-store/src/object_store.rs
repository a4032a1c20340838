//! Object-level operations over a [`StoreClient`].

use crate::{RedisStoreClient, StoreClient};
use keyhash_config::StoreConfig;
use keyhash_core::{
    decode_object, decode_scalar, encode_object, encode_scalar, FieldValue, HashObject, Key,
    KeyHashResult,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Key of the hash holding single-sign-on configurations.
pub const SSO_CONFIGS_KEY: &str = "sso-configs";

/// Options for [`ObjectStore::store_object`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Time-to-live in seconds. `None` or `0` leaves any existing TTL alone.
    pub ttl: Option<u64>,
}

impl StoreOptions {
    /// Options setting a time-to-live in seconds.
    #[must_use]
    pub const fn with_ttl(seconds: u64) -> Self {
        Self { ttl: Some(seconds) }
    }
}

/// Typed access to hash objects and JSON values in a store.
///
/// Cloning is cheap: clones share the same client.
#[derive(Clone)]
pub struct ObjectStore {
    client: Arc<dyn StoreClient>,
}

impl ObjectStore {
    /// Create an object store over an existing client.
    #[must_use]
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self { client }
    }

    /// Create an object store backed by Redis.
    pub fn from_config(config: &StoreConfig) -> KeyHashResult<Self> {
        let client = RedisStoreClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// The underlying store client.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    /// Fetch a hash object. A missing key yields an empty object.
    pub async fn fetch_object(&self, key: impl Into<Key>) -> KeyHashResult<HashObject> {
        let key = key.into();
        let encoded = self.client.hash_get_all(key.as_str()).await?;
        decode_object(encoded)
    }

    /// Store the fields of a hash object, then apply the TTL if one is set.
    ///
    /// The two commands are not atomic: if the expire fails, the fields stay
    /// stored without a TTL.
    pub async fn store_object(
        &self,
        key: impl Into<Key>,
        object: &HashObject,
        options: StoreOptions,
    ) -> KeyHashResult<()> {
        let key = key.into();
        let encoded = encode_object(object)?;

        self.client.hash_set_multiple(key.as_str(), &encoded).await?;

        if let Some(ttl) = options.ttl.filter(|ttl| *ttl > 0) {
            self.client.expire(key.as_str(), ttl).await?;
        }

        debug!(key = %key, fields = encoded.len(), ttl = ?options.ttl, "Stored object");
        Ok(())
    }

    /// Delete an object.
    pub async fn destroy_object(&self, key: impl Into<Key>) -> KeyHashResult<()> {
        let key = key.into();
        let deleted = self.client.delete(key.as_str()).await?;
        debug!(key = %key, deleted, "Destroyed object");
        Ok(())
    }

    /// Fetch a JSON value.
    ///
    /// Returns `None` when the key does not exist. A stored JSON `null` is
    /// `Some` of whatever `T` decodes `null` to.
    pub async fn fetch<T: DeserializeOwned>(&self, key: impl Into<Key>) -> KeyHashResult<Option<T>> {
        let key = key.into();
        match self.client.get(key.as_str()).await? {
            Some(text) => decode_scalar(&text).map(Some),
            None => Ok(None),
        }
    }

    /// Store a value as JSON.
    pub async fn store<T: Serialize + ?Sized>(
        &self,
        key: impl Into<Key>,
        value: &T,
    ) -> KeyHashResult<()> {
        let key = key.into();
        let text = encode_scalar(value)?;
        self.client.set(key.as_str(), &text).await
    }

    /// Set a key's time-to-live in seconds.
    pub async fn expire(&self, key: impl Into<Key>, ttl_seconds: u64) -> KeyHashResult<()> {
        let key = key.into();
        let applied = self.client.expire(key.as_str(), ttl_seconds).await?;
        if !applied {
            debug!(key = %key, "Expire on missing key");
        }
        Ok(())
    }

    /// Look up the SSO configuration registered for an endpoint and secret.
    ///
    /// All configurations live in the [`SSO_CONFIGS_KEY`] hash, one field per
    /// `endpoint:secret_id` pair.
    pub async fn get_sso_config(
        &self,
        endpoint: &str,
        secret_id: &str,
    ) -> KeyHashResult<Option<FieldValue>> {
        let mut configs = self.fetch_object(SSO_CONFIGS_KEY).await?;
        let field = Key::from([endpoint, secret_id]);
        Ok(configs.remove(field.as_str()))
    }
}
