//! Session authentication route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tradepost_core::Username;

use crate::error::{AppError, Result};
use crate::middleware::auth::{self, RequireAuth};
use crate::models::{CurrentUser, User};
use crate::services::UserService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Auth routes.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/current", get(current).delete(logout))
}

/// Log in with username and password.
///
/// A wrong password and an unknown username are both reported as the same
/// 401; nothing about account existence leaks through the login endpoint.
#[instrument(skip_all, fields(username = %body.username))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<User>> {
    let username = Username::parse(&body.username)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if body.password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_owned()));
    }

    let service = UserService::new(state.pool());
    let user = service.authenticate(&username, &body.password).await?;

    auth::set_current_user(
        &session,
        &CurrentUser {
            username: user.username.clone(),
            role: user.role,
        },
    )
    .await?;

    tracing::info!(username = %user.username, "login successful");
    Ok(Json(user))
}

/// Return the currently logged-in user's full record.
async fn current(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<Json<User>> {
    let service = UserService::new(state.pool());
    let user = service.user_by_username(&actor, &actor.username).await?;
    Ok(Json(user))
}

/// Log out the current session.
async fn logout(session: Session) -> Result<StatusCode> {
    auth::clear_current_user(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
