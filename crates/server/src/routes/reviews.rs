//! Review route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use serde::Deserialize;
use tracing::instrument;

use tradepost_core::ProductModel;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::Review;
use crate::services::ReviewService;
use crate::state::AppState;

use super::{require_customer, require_manager_or_admin};

/// Review creation request body.
#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub score: u8,
    pub comment: String,
}

/// Review routes.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", delete(delete_all_reviews))
        .route(
            "/reviews/{model}",
            post(add_review).get(list_reviews).delete(delete_review),
        )
        .route("/reviews/{model}/all", delete(delete_product_reviews))
}

/// Add a review to a product. Customers only; one review per product per
/// user.
#[instrument(skip_all, fields(actor = %actor.username, model = %model))]
async fn add_review(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(model): Path<String>,
    Json(body): Json<AddReviewRequest>,
) -> Result<StatusCode> {
    require_customer(&actor)?;

    let model = ProductModel::parse(&model).map_err(|e| AppError::Validation(e.to_string()))?;
    if !(1..=5).contains(&body.score) {
        return Err(AppError::Validation(
            "score must be between 1 and 5".to_owned(),
        ));
    }
    if body.comment.is_empty() {
        return Err(AppError::Validation("comment cannot be empty".to_owned()));
    }

    let service = ReviewService::new(state.pool());
    service
        .add_review(&model, &actor, body.score, &body.comment)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List all reviews of a product. Any logged-in user.
///
/// An unknown model yields an empty list, same as a reviewless product.
async fn list_reviews(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Path(model): Path<String>,
) -> Result<Json<Vec<Review>>> {
    let model = ProductModel::parse(&model).map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ReviewService::new(state.pool());
    Ok(Json(service.product_reviews(&model).await?))
}

/// Delete the acting user's own review of a product. Customers only.
#[instrument(skip_all, fields(actor = %actor.username, model = %model))]
async fn delete_review(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(model): Path<String>,
) -> Result<StatusCode> {
    require_customer(&actor)?;

    let model = ProductModel::parse(&model).map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ReviewService::new(state.pool());
    service.delete_review(&model, &actor).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete every review of a product. Store staff only.
#[instrument(skip_all, fields(actor = %actor.username, model = %model))]
async fn delete_product_reviews(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(model): Path<String>,
) -> Result<StatusCode> {
    require_manager_or_admin(&actor)?;

    let model = ProductModel::parse(&model).map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ReviewService::new(state.pool());
    service.delete_reviews_of_product(&model).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete every review in the store. Store staff only.
#[instrument(skip_all, fields(actor = %actor.username))]
async fn delete_all_reviews(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<StatusCode> {
    require_manager_or_admin(&actor)?;

    let service = ReviewService::new(state.pool());
    service.delete_all_reviews().await?;

    Ok(StatusCode::NO_CONTENT)
}
