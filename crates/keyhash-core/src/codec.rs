//! Whole-value codec: values are stored as JSON text.

use crate::{KeyHashError, KeyHashResult};
use serde::{de::DeserializeOwned, Serialize};

/// Encodes any serializable value, primitives included, as JSON text.
pub fn encode_scalar<T: Serialize + ?Sized>(value: &T) -> KeyHashResult<String> {
    serde_json::to_string(value).map_err(KeyHashError::Encode)
}

/// Parses JSON text back into a value.
pub fn decode_scalar<T: DeserializeOwned>(text: &str) -> KeyHashResult<T> {
    serde_json::from_str(text).map_err(|e| KeyHashError::decode("scalar value", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        user: String,
        scopes: Vec<String>,
    }

    #[test]
    fn test_primitives() {
        assert_eq!(encode_scalar(&42).unwrap(), "42");
        assert_eq!(encode_scalar("hi").unwrap(), "\"hi\"");
        assert_eq!(encode_scalar(&Value::Null).unwrap(), "null");
        assert!(decode_scalar::<bool>("true").unwrap());
    }

    #[test]
    fn test_struct_value() {
        let session = Session {
            user: "ada".into(),
            scopes: vec!["read".into(), "write".into()],
        };
        let text = encode_scalar(&session).unwrap();
        assert_eq!(decode_scalar::<Session>(&text).unwrap(), session);
    }

    #[test]
    fn test_nested_json() {
        let value = json!({"a": [1, 2, {"b": null}], "c": "d"});
        let text = encode_scalar(&value).unwrap();
        assert_eq!(decode_scalar::<Value>(&text).unwrap(), value);
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = decode_scalar::<Value>("not json").unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_type_mismatch_is_decode_error() {
        let err = decode_scalar::<u32>("\"text\"").unwrap_err();
        assert!(matches!(err, KeyHashError::Decode { .. }));
    }
}
