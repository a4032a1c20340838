//! Redis store client over a multiplexed, self-reconnecting connection.

use super::store_error;
use crate::StoreClient;
use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;
use keyhash_config::StoreConfig;
use keyhash_core::{EncodedHashObject, KeyHashError, KeyHashResult};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Redis-backed [`StoreClient`].
///
/// The connection is opened on first use, so constructing a client never
/// fails on an unreachable server; the first command reports it instead.
pub struct RedisStoreClient {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStoreClient {
    /// Create a client from connection configuration.
    pub fn new(config: &StoreConfig) -> KeyHashResult<Self> {
        let url = config.connection_url()?;
        let client = Client::open(url.as_str()).map_err(|e| {
            KeyHashError::configuration(format!("Invalid store connection settings: {e}"))
        })?;

        info!(store = %config.redacted_target(), "Created Redis store client");

        Ok(Self::from_client(client))
    }

    /// Wrap a pre-built Redis client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            connection: OnceCell::new(),
        }
    }

    /// Returns true once a connection has been established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Get a handle to the shared connection, opening it if needed.
    async fn conn(&self) -> KeyHashResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                debug!("Opening Redis connection");
                ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(|e| store_error("connect", "", e))
            })
            .await?;

        Ok(manager.clone())
    }

    /// Round-trip a PING to the server.
    pub async fn ping(&self) -> KeyHashResult<()> {
        let mut conn = self.conn().await?;
        let _: String = ::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("ping", "", e))?;
        Ok(())
    }
}

#[async_trait]
impl StoreClient for RedisStoreClient {
    async fn get(&self, key: &str) -> KeyHashResult<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| store_error("get", key, e))?;

        match &value {
            Some(_) => debug!("GET hit for key '{}'", key),
            None => debug!("GET miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> KeyHashResult<()> {
        let mut conn = self.conn().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| store_error("set", key, e))?;

        debug!("SET key '{}'", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> KeyHashResult<u64> {
        let mut conn = self.conn().await?;
        let deleted: u64 = conn
            .del(key)
            .await
            .map_err(|e| store_error("del", key, e))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted)
    }

    async fn expire(&self, key: &str, seconds: u64) -> KeyHashResult<bool> {
        let mut conn = self.conn().await?;
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        let applied: bool = conn
            .expire(key, seconds)
            .await
            .map_err(|e| store_error("expire", key, e))?;

        debug!("EXPIRE key '{}' in {}s: {}", key, seconds, applied);
        Ok(applied)
    }

    async fn hash_get_all(&self, key: &str) -> KeyHashResult<EncodedHashObject> {
        let mut conn = self.conn().await?;
        let fields: EncodedHashObject = conn
            .hgetall(key)
            .await
            .map_err(|e| store_error("hgetall", key, e))?;

        debug!("HGETALL key '{}': {} fields", key, fields.len());
        Ok(fields)
    }

    async fn hash_set_multiple(&self, key: &str, fields: &EncodedHashObject) -> KeyHashResult<()> {
        // HSET needs at least one field/value pair.
        if fields.is_empty() {
            debug!("HSET key '{}' skipped: no fields", key);
            return Ok(());
        }

        let items: Vec<(&str, &str)> = fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        let mut conn = self.conn().await?;
        conn.hset_multiple::<_, _, _, ()>(key, items.as_slice())
            .await
            .map_err(|e| store_error("hset", key, e))?;

        debug!("HSET key '{}': {} fields", key, items.len());
        Ok(())
    }
}
