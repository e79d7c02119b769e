//! Product identifier newtype.
//!
//! The backend owns product identity. Depending on the backend, `id` arrives
//! as a JSON string (`"b3c1..."`) or a JSON integer (`42`). [`ProductId`]
//! accepts both, compares by textual form, and serializes back in the shape
//! it was received so mutation requests echo the backend's own value.

use core::fmt;
use core::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("product id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that cannot appear in a URL path segment.
    #[error("product id contains an invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// A backend product identifier.
///
/// ## Constraints
///
/// - Length: 1-128 characters
/// - No `/`, `?`, `#`, whitespace, or control characters (the id is used as
///   a path segment in admin URLs)
///
/// ## Examples
///
/// ```
/// use shelfdesk_core::ProductId;
///
/// let id = ProductId::parse("42").unwrap();
/// assert_eq!(id.as_str(), "42");
///
/// assert!(ProductId::parse("").is_err());
/// assert!(ProductId::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, Eq)]
pub struct ProductId {
    text: String,
    numeric: bool,
}

impl ProductId {
    /// Maximum length of a product id.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `ProductId` from text (e.g., a URL path segment).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 128 characters, or
    /// contains a character that is not allowed in a path segment.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ProductIdError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(ProductIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace() || c.is_control())
        {
            return Err(ProductIdError::InvalidCharacter(c));
        }

        Ok(Self {
            text: s.to_owned(),
            numeric: false,
        })
    }

    /// Create a `ProductId` from a numeric backend id.
    #[must_use]
    pub fn from_number(id: i64) -> Self {
        Self {
            text: id.to_string(),
            numeric: true,
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the backend sent this id as a JSON number.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.numeric
    }
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric
            && let Ok(n) = self.text.parse::<i64>()
        {
            return serializer.serialize_i64(n);
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(Self::from_number(n)),
            RawId::Text(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ids() {
        assert!(ProductId::parse("42").is_ok());
        assert!(ProductId::parse("0b4f3c1e-9a7d-4d3b-8d7e-2f3e4a5b6c7d").is_ok());
        assert!(ProductId::parse("prod_ABC-123").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  17 ").unwrap();
        assert_eq!(id.as_str(), "17");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(ProductId::MAX_LENGTH + 1);
        assert!(matches!(
            ProductId::parse(&long),
            Err(ProductIdError::TooLong { max: 128 })
        ));
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert_eq!(
            ProductId::parse("a/b"),
            Err(ProductIdError::InvalidCharacter('/'))
        );
        assert_eq!(
            ProductId::parse("a b"),
            Err(ProductIdError::InvalidCharacter(' '))
        );
        assert!(ProductId::parse("a?b").is_err());
    }

    #[test]
    fn test_numeric_and_text_ids_compare_by_text() {
        assert_eq!(ProductId::from_number(7), ProductId::parse("7").unwrap());
    }

    #[test]
    fn test_deserialize_number_keeps_shape() {
        let id: ProductId = serde_json::from_str("42").unwrap();
        assert!(id.is_numeric());
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_deserialize_string_keeps_shape() {
        let id: ProductId = serde_json::from_str("\"abc-1\"").unwrap();
        assert!(!id.is_numeric());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-1\"");
    }

    #[test]
    fn test_deserialize_rejects_empty_string() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
    }
}
