//! User domain types.

use chrono::NaiveDate;
use serde::Serialize;

use tradepost_core::{Role, UserId, Username};

/// A registered account (domain type).
///
/// The password hash never appears here; handlers that need it go through
/// [`crate::db::users::UserRepository::get_password_hash`].
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique, immutable account name.
    pub username: Username,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Account role, fixed at registration.
    pub role: Role,
    /// Shipping address, if provided.
    pub address: Option<String>,
    /// Date of birth, if provided. Never in the future.
    pub birthdate: Option<NaiveDate>,
}

/// Data required to insert a new account row.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique account name.
    pub username: Username,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Account role.
    pub role: Role,
    /// Argon2id PHC string (salt embedded).
    pub password_hash: String,
}
