//! Domain type definitions.
//!
//! All types here carry their validation with them: a constructed value is a
//! valid value. Database and HTTP layers parse into these types at their
//! boundaries.

mod id;
mod model;
mod role;
mod username;

pub use id::{ProductId, ReviewId, UserId};
pub use model::{ProductModel, ProductModelError};
pub use role::{Role, RoleError};
pub use username::{Username, UsernameError};
