//! Error types shared by every Keyhash crate.

use thiserror::Error;

/// A specialized `Result` type for Keyhash operations.
pub type KeyHashResult<T> = Result<T, KeyHashError>;

/// Unified error type for Keyhash.
///
/// Nothing in Keyhash recovers from these locally: every variant is surfaced
/// to the caller of the operation that produced it.
#[derive(Error, Debug)]
pub enum KeyHashError {
    // ============ Codec Errors ============
    /// Stored text was not valid JSON, or did not match the requested type.
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// A hash-object field name ends with the structured-value marker.
    #[error("Field name '{0}' must not end with the structured-value marker '!'")]
    ReservedFieldName(String),

    // ============ Store Errors ============
    /// Failure reported by the store client, propagated unchanged.
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Invalid connection or application configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl KeyHashError {
    /// Creates a decode error with a description of what was being decoded.
    #[must_use]
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true for malformed stored data.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns true when the store client lost or could not reach its server.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::Store(err) => {
                err.is_io_error()
                    || err.is_connection_refusal()
                    || err.is_connection_dropped()
                    || err.is_timeout()
            }
            _ => false,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::ReservedFieldName(_) => "RESERVED_FIELD_NAME",
            Self::Store(_) => "STORE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}
