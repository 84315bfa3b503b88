//! Product model type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductModel`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProductModelError {
    /// The input string is empty.
    #[error("product model cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("product model must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A unique product model identifier (e.g. `"iPhone13"`).
///
/// The model is the business key of the product catalog: reviews reference
/// products by model, and existence checks before dependent writes go through
/// this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ProductModel(String);

impl ProductModel {
    /// Maximum length of a product model.
    pub const MAX_LENGTH: usize = 128;

    /// Parse a `ProductModel` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or longer than 128 characters.
    pub fn parse(s: &str) -> Result<Self, ProductModelError> {
        if s.is_empty() {
            return Err(ProductModelError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ProductModelError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the model as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductModel` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductModel {
    type Err = ProductModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductModel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
