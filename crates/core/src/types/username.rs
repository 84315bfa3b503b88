//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains leading or trailing whitespace.
    #[error("username cannot start or end with whitespace")]
    SurroundingWhitespace,
}

/// A unique, case-sensitive account identifier.
///
/// Usernames are the primary key of the user table and are immutable after
/// registration. Comparison is exact: `"Alice"` and `"alice"` are different
/// accounts.
///
/// ## Constraints
///
/// - Length: 1-64 characters
/// - No leading or trailing whitespace
///
/// ## Examples
///
/// ```
/// use tradepost_core::Username;
///
/// assert!(Username::parse("alice").is_ok());
/// assert!(Username::parse("").is_err());
/// assert!(Username::parse(" alice").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 64 characters, or
    /// has surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.trim() != s {
            return Err(UsernameError::SurroundingWhitespace);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("Alice-42").is_ok());
        assert!(Username::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        assert!(matches!(
            Username::parse(" alice"),
            Err(UsernameError::SurroundingWhitespace)
        ));
        assert!(matches!(
            Username::parse("alice "),
            Err(UsernameError::SurroundingWhitespace)
        ));
    }

    #[test]
    fn test_case_sensitive_equality() {
        let lower = Username::parse("alice").unwrap();
        let upper = Username::parse("Alice").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_serde_roundtrip() {
        let username = Username::parse("alice").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"alice\"");
        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, username);
    }
}
