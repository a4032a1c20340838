//! # Keyhash Core
//!
//! Stateless building blocks for storing application values in a flat
//! key/value + hash store:
//!
//! - [`Key`] composes hierarchical keys into the store's flat namespace.
//! - [`codec`] encodes whole values as JSON text.
//! - [`hash`] encodes hash-object fields, marking structured values with a
//!   trailing `!` on the field name.
//!
//! Nothing here performs I/O; the `keyhash-store` crate wires these codecs to
//! a store client.

pub mod codec;
pub mod error;
pub mod hash;
pub mod key;
pub mod telemetry;

pub use codec::{decode_scalar, encode_scalar};
pub use error::*;
pub use hash::{
    decode_field, decode_object, encode_field, encode_object, EncodedHashObject, FieldValue,
    HashObject, STRUCTURED_MARKER,
};
pub use key::{to_key, Key, KEY_DELIMITER};
pub use telemetry::{init_tracing, TelemetryConfig};

// Re-export shaku for dependency injection
pub use shaku::Interface;
