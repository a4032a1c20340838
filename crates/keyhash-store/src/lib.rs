//! # Keyhash Store
//!
//! Object-level access to a Redis-compatible key/value store.
//!
//! [`ObjectStore`] resolves keys, runs values through the `keyhash-core`
//! codecs and issues the matching [`StoreClient`] commands. It keeps no state
//! between calls and never retries: every failure reaches the caller.
//!
//! ```rust,ignore
//! use keyhash_config::StoreConfig;
//! use keyhash_store::{ObjectStore, StoreOptions};
//!
//! let store = ObjectStore::from_config(&StoreConfig::tcp("localhost", 6379))?;
//!
//! let mut session = HashObject::new();
//! session.insert("user".into(), "ada".into());
//! session.insert("roles".into(), FieldValue::structured(&["admin"])?);
//!
//! store
//!     .store_object(["session", "abc123"], &session, StoreOptions::with_ttl(3600))
//!     .await?;
//! ```

pub mod client;
pub mod memory;
pub mod object_store;
pub mod redis;

pub use client::StoreClient;
pub use memory::MemoryStoreClient;
pub use object_store::{ObjectStore, StoreOptions, SSO_CONFIGS_KEY};
pub use crate::redis::RedisStoreClient;
