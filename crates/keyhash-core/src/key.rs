//! Key addressing: hierarchical keys flattened into the store namespace.

use std::fmt;

/// Separator placed between key segments.
pub const KEY_DELIMITER: char = ':';

/// A store key in canonical (flat) form.
///
/// Built either from a single token, used unchanged, or from an ordered list
/// of segments joined with `:`. Segment content is not validated: a segment
/// that itself contains `:` merges into the neighbouring namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Joins path segments into a key.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                key.push(KEY_DELIMITER);
            }
            key.push_str(segment.as_ref());
        }
        Self(key)
    }

    /// Returns the canonical key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the canonical string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for Key {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&String> for Key {
    fn from(token: &String) -> Self {
        Self(token.clone())
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Key {
    fn from(segments: [S; N]) -> Self {
        Self::from_segments(segments)
    }
}

impl<S: AsRef<str>> From<&[S]> for Key {
    fn from(segments: &[S]) -> Self {
        Self::from_segments(segments)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for Key {
    fn from(segments: Vec<S>) -> Self {
        Self::from_segments(segments)
    }
}

/// Resolves a token or a segment list into its flat key string.
pub fn to_key(input: impl Into<Key>) -> String {
    input.into().into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_joined() {
        assert_eq!(to_key(["sso-configs", "acme"]), "sso-configs:acme");
    }

    #[test]
    fn test_plain_token_unchanged() {
        assert_eq!(to_key("plain"), "plain");
        assert_eq!(to_key(String::from("a:b")), "a:b");
    }

    #[test]
    fn test_vec_and_slice_segments() {
        let owned = vec!["user".to_string(), "42".to_string(), "profile".to_string()];
        assert_eq!(to_key(&owned[..]), "user:42:profile");
        assert_eq!(to_key(owned), "user:42:profile");
    }

    #[test]
    fn test_single_and_empty_segments() {
        assert_eq!(to_key(["only"]), "only");
        assert_eq!(to_key(Vec::<&str>::new()), "");
        assert_eq!(to_key(["a", "", "b"]), "a::b");
    }

    #[test]
    fn test_embedded_delimiter_merges_namespaces() {
        assert_eq!(to_key(["a:b", "c"]), to_key(["a", "b:c"]));
    }

    #[test]
    fn test_display() {
        let key = Key::from(["tenant", "7"]);
        assert_eq!(key.to_string(), "tenant:7");
        assert_eq!(key.as_str(), "tenant:7");
    }
}
