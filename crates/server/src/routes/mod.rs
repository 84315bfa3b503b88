//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check (in main)
//! GET    /health/ready           - Readiness check (in main)
//!
//! # Auth
//! POST   /auth/login             - Log in with username and password
//! GET    /auth/current           - Current logged-in user
//! DELETE /auth/current           - Log out
//!
//! # Users
//! POST   /users                  - Register (open, no auth)
//! GET    /users                  - List all users (Admin)
//! GET    /users/roles/{role}     - List users by role (Admin)
//! GET    /users/{username}       - Get one user (self or Admin)
//! PATCH  /users/{username}       - Update personal info (self or Admin)
//! DELETE /users/{username}       - Delete account (self or Admin, never Admin targets)
//! DELETE /users                  - Delete all non-admin users (Admin)
//!
//! # Reviews
//! POST   /reviews/{model}        - Add a review (Customer)
//! GET    /reviews/{model}        - List reviews of a product (logged in)
//! DELETE /reviews/{model}        - Delete own review (Customer)
//! DELETE /reviews/{model}/all    - Delete all reviews of a product (Admin|Manager)
//! DELETE /reviews                - Delete every review (Admin|Manager)
//! ```
//!
//! Role gates listed above are route-layer preconditions; the services
//! enforce the per-record authorization rules themselves.

pub mod auth;
pub mod reviews;
pub mod users;

use axum::Router;

use tradepost_core::Role;

use crate::error::AppError;
use crate::models::CurrentUser;
use crate::services::UserError;
use crate::state::AppState;

/// Build the full application router.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .merge(reviews::routes())
}

/// Route-layer gate: only admins pass.
pub(crate) fn require_admin(actor: &CurrentUser) -> Result<(), AppError> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(UserError::Unauthorized.into())
    }
}

/// Route-layer gate: store staff (managers and admins) pass.
pub(crate) fn require_manager_or_admin(actor: &CurrentUser) -> Result<(), AppError> {
    match actor.role {
        Role::Manager | Role::Admin => Ok(()),
        Role::Customer => Err(UserError::Unauthorized.into()),
    }
}

/// Route-layer gate: only customers pass (reviews are authored by shoppers).
pub(crate) fn require_customer(actor: &CurrentUser) -> Result<(), AppError> {
    match actor.role {
        Role::Customer => Ok(()),
        Role::Manager | Role::Admin => Err(UserError::Unauthorized.into()),
    }
}
