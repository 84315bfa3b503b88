//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use tradepost_core::{Role, Username};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in actor.
/// Everything authorization needs to decide is here: who the actor is and
/// what role they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Account name of the logged-in user.
    pub username: Username,
    /// Role of the logged-in user.
    pub role: Role,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
