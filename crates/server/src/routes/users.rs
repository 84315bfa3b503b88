//! User route handlers.
//!
//! Request shape validation (parseable username, non-empty names, valid
//! dates) happens here; the service layer owns the authorization and
//! cross-record rules.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use tradepost_core::{Role, Username};

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::User;
use crate::services::UserService;
use crate::state::AppState;

use super::require_admin;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub password: String,
    pub role: Role,
}

/// Personal info update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub surname: String,
    pub address: Option<String>,
    pub birthdate: Option<NaiveDate>,
}

/// User routes.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users).delete(delete_non_admins))
        .route("/users/roles/{role}", get(list_users_by_role))
        .route(
            "/users/{username}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

/// Register a new account. Open to anyone, including anonymous callers.
#[instrument(skip_all, fields(username = %body.username, role = %body.role))]
async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<StatusCode> {
    let username =
        Username::parse(&body.username).map_err(|e| AppError::Validation(e.to_string()))?;
    if body.name.is_empty() || body.surname.is_empty() {
        return Err(AppError::Validation(
            "name and surname cannot be empty".to_owned(),
        ));
    }
    if body.password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_owned()));
    }

    let service = UserService::new(state.pool());
    service
        .create_user(username, body.name, body.surname, &body.password, body.role)
        .await?;

    Ok(StatusCode::CREATED)
}

/// List every account. Admin only.
async fn list_users(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<Vec<User>>> {
    require_admin(&actor)?;

    let service = UserService::new(state.pool());
    Ok(Json(service.users().await?))
}

/// List accounts with a given role. Admin only.
async fn list_users_by_role(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(role): Path<String>,
) -> Result<Json<Vec<User>>> {
    require_admin(&actor)?;

    let role: Role = role
        .parse()
        .map_err(|e: tradepost_core::RoleError| AppError::Validation(e.to_string()))?;

    let service = UserService::new(state.pool());
    Ok(Json(service.users_by_role(role).await?))
}

/// Get one account. Self or admin.
async fn get_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(username): Path<String>,
) -> Result<Json<User>> {
    let target =
        Username::parse(&username).map_err(|e| AppError::Validation(e.to_string()))?;

    let service = UserService::new(state.pool());
    Ok(Json(service.user_by_username(&actor, &target).await?))
}

/// Update the personal info of an account. Self or admin (non-admin targets
/// only).
#[instrument(skip_all, fields(actor = %actor.username, target = %username))]
async fn update_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(username): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let target =
        Username::parse(&username).map_err(|e| AppError::Validation(e.to_string()))?;
    if body.name.is_empty() || body.surname.is_empty() {
        return Err(AppError::Validation(
            "name and surname cannot be empty".to_owned(),
        ));
    }

    let service = UserService::new(state.pool());
    let user = service
        .update_user_info(
            &actor,
            &body.name,
            &body.surname,
            body.address.as_deref(),
            body.birthdate,
            &target,
        )
        .await?;

    Ok(Json(user))
}

/// Delete an account. Self-delete for any role; admins may delete non-admin
/// accounts.
#[instrument(skip_all, fields(actor = %actor.username, target = %username))]
async fn delete_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(username): Path<String>,
) -> Result<StatusCode> {
    let target =
        Username::parse(&username).map_err(|e| AppError::Validation(e.to_string()))?;

    let service = UserService::new(state.pool());
    service.delete_user(&actor, &target).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete every non-admin account. Admin only.
#[instrument(skip_all, fields(actor = %actor.username))]
async fn delete_non_admins(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<StatusCode> {
    require_admin(&actor)?;

    let service = UserService::new(state.pool());
    let removed = service.delete_non_admins().await?;
    tracing::info!(removed, "bulk user delete complete");

    Ok(StatusCode::NO_CONTENT)
}
