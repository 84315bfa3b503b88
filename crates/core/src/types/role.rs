//! User role type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`Role`] from a string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown role: {0:?} (expected Customer, Manager or Admin)")]
pub struct RoleError(pub String);

/// The role assigned to a user account.
///
/// Roles form a closed set; authorization decisions match exhaustively on
/// this enum so a misspelled or differently-cased role string can never slip
/// through a comparison. The role of an account is immutable after creation.
///
/// ## Examples
///
/// ```
/// use tradepost_core::Role;
///
/// let role: Role = "Admin".parse().unwrap();
/// assert!(role.is_admin());
/// assert!("admin".parse::<Role>().is_err()); // case-sensitive
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular shopper. May review products and manage their own account.
    Customer,
    /// Store staff. May manage products and perform review cleanup.
    Manager,
    /// Full access, including user administration.
    Admin,
}

impl Role {
    /// Returns the canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }

    /// Whether this role carries administrative privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(Self::Customer),
            "Manager" => Ok(Self::Manager),
            "Admin" => Ok(Self::Admin),
            other => Err(RoleError(other.to_owned())),
        }
    }
}
