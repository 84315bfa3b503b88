//! Domain models.
//!
//! These types represent validated domain objects separate from database row
//! types. Repositories parse rows into them at the storage boundary.

pub mod product;
pub mod review;
pub mod session;
pub mod user;

pub use product::{NewProduct, Product};
pub use review::Review;
pub use session::CurrentUser;
pub use user::{NewUser, User};
