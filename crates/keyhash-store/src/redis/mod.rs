//! Redis-backed store client.

mod client;

pub use client::RedisStoreClient;

use keyhash_core::KeyHashError;
use tracing::warn;

/// Maps a Redis failure into a store error.
///
/// Connection-class failures are also logged here: they describe the state of
/// the shared connection rather than the command that happened to see them.
pub(crate) fn store_error(operation: &'static str, key: &str, err: ::redis::RedisError) -> KeyHashError {
    let err = KeyHashError::Store(err);
    if err.is_connection_error() {
        warn!(operation, key = %key, error = %err, "Store connection error");
    }
    err
}
