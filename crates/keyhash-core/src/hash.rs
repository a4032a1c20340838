//! Hash-object field codec.
//!
//! Store hashes are flat `field -> string` maps. To keep arbitrary structured
//! values in them, a structured value is written as JSON text under its field
//! name plus a trailing [`STRUCTURED_MARKER`]. Plain strings are written
//! verbatim under the bare field name so simple values stay human-readable in
//! the store.
//!
//! ```text
//! HashObject                         EncodedHashObject
//! color  => Plain("red")        <->  color   => red
//! prefs  => Structured({"a":1}) <->  prefs!  => {"a":1}
//! ```

use crate::{KeyHashError, KeyHashResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::warn;

/// Suffix marking a wire field whose value is JSON text.
pub const STRUCTURED_MARKER: char = '!';

/// Decoded hash object: field name to value.
pub type HashObject = BTreeMap<String, FieldValue>;

/// Wire form of a hash object, as exchanged with the store.
pub type EncodedHashObject = BTreeMap<String, String>;

/// A single hash-object field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Stored verbatim. Empty strings are plain too.
    Plain(String),
    /// Stored as JSON text under a marked field name.
    Structured(Value),
}

impl FieldValue {
    /// Builds a structured value from anything serializable.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> KeyHashResult<Self> {
        serde_json::to_value(value)
            .map(Self::Structured)
            .map_err(KeyHashError::Encode)
    }

    /// Returns the string for plain values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Plain(s) => Some(s),
            Self::Structured(_) => None,
        }
    }

    /// Returns true if the value is stored as JSON.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Returns the value as JSON; plain strings become JSON strings.
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.clone().into_json()
    }

    /// Consumes the value, returning it as JSON.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Self::Plain(s) => Value::String(s),
            Self::Structured(v) => v,
        }
    }

    /// Deserializes the value into a typed structure.
    pub fn deserialize<T: DeserializeOwned>(&self) -> KeyHashResult<T> {
        serde_json::from_value(self.to_json()).map_err(|e| KeyHashError::decode("field value", e))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}

/// JSON strings convert to [`FieldValue::Plain`]; everything else is
/// structured.
impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Plain(s),
            other => Self::Structured(other),
        }
    }
}

/// Encodes one field into its wire name and wire value.
///
/// Field names ending in the marker are rejected: they would be read back as
/// structured fields, and could collide with the marked form of another
/// field.
pub fn encode_field(name: &str, value: &FieldValue) -> KeyHashResult<(String, String)> {
    if name.ends_with(STRUCTURED_MARKER) {
        return Err(KeyHashError::ReservedFieldName(name.to_string()));
    }

    match value {
        FieldValue::Plain(s) => Ok((name.to_string(), s.clone())),
        FieldValue::Structured(v) => {
            let text = serde_json::to_string(v).map_err(KeyHashError::Encode)?;
            Ok((format!("{name}{STRUCTURED_MARKER}"), text))
        }
    }
}

/// Decodes one wire field back into its field name and value.
pub fn decode_field(wire_name: &str, wire_value: &str) -> KeyHashResult<(String, FieldValue)> {
    decode_owned(wire_name.to_string(), wire_value.to_string())
}

fn decode_owned(wire_name: String, wire_value: String) -> KeyHashResult<(String, FieldValue)> {
    match wire_name.strip_suffix(STRUCTURED_MARKER) {
        Some(name) => {
            let value = serde_json::from_str(&wire_value)
                .map_err(|e| KeyHashError::decode(format!("field '{wire_name}'"), e))?;
            Ok((name.to_string(), FieldValue::Structured(value)))
        }
        None => Ok((wire_name, FieldValue::Plain(wire_value))),
    }
}

/// Encodes every field of a hash object.
pub fn encode_object(object: &HashObject) -> KeyHashResult<EncodedHashObject> {
    object
        .iter()
        .map(|(name, value)| encode_field(name, value))
        .collect()
}

/// Decodes every field of a wire hash.
///
/// A hash can hold both `x` and `x!`: writes merge into the existing hash, so
/// re-storing a plain field as structured leaves the stale plain one behind.
/// The marked `x!` form wins and the stale field is ignored.
pub fn decode_object(encoded: EncodedHashObject) -> KeyHashResult<HashObject> {
    let mut object = HashObject::new();
    for (wire_name, wire_value) in encoded {
        let (name, value) = decode_owned(wire_name, wire_value)?;
        match object.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                warn!(
                    field = %slot.key(),
                    "Hash holds both plain and structured forms, using structured"
                );
                if value.is_structured() {
                    slot.insert(value);
                }
            }
        }
    }
    Ok(object)
}
