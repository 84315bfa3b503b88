//! Domain services (coordinators).
//!
//! Services enforce the cross-entity rules the storage layer cannot express
//! alone: "a review requires an existing product", "an admin cannot delete
//! another admin", "a customer may only modify their own record". They hold
//! no state of their own beyond borrowed repositories and are safe to
//! construct per request.

pub mod password;
pub mod reviews;
pub mod users;

pub use reviews::{ReviewError, ReviewService};
pub use users::{UserError, UserService};

use tradepost_core::Username;

use crate::models::CurrentUser;

/// Authorization predicate for acting on a user record.
///
/// An actor may act on a target account iff the actor is an admin or the
/// target is the actor's own account.
#[must_use]
pub fn can_act_on(actor: &CurrentUser, target: &Username) -> bool {
    actor.role.is_admin() || actor.username == *target
}
