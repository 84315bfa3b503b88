//! Review coordination service.
//!
//! Sequences the existence checks and single writes that keep the review
//! table consistent with the catalog. Every operation is a strictly
//! sequential chain of storage calls; there is no cross-step transaction,
//! which is sound here because every chain is check-then-single-write. For
//! concurrent duplicate inserts the UNIQUE (product, user) constraint is the
//! final arbiter: the losing call observes [`ReviewError::ExistingReview`],
//! not a generic storage failure.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use tradepost_core::ProductModel;

use crate::db::{ProductRepository, RepositoryError, ReviewRepository};
use crate::models::{CurrentUser, Review};

/// Errors surfaced by review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The referenced product model has no row.
    #[error("product not found")]
    ProductNotFound,

    /// The acting user already has a review for this product.
    #[error("review already exists for this user and product")]
    ExistingReview,

    /// The acting user has no review for this (existing) product.
    #[error("no review found for this user and product")]
    NoReviewFound,

    /// Any other storage failure, cause preserved for logging.
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

/// Review coordination service.
pub struct ReviewService<'a> {
    products: ProductRepository<'a>,
    reviews: ReviewRepository<'a>,
}

impl<'a> ReviewService<'a> {
    /// Create a new review service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            reviews: ReviewRepository::new(pool),
        }
    }

    /// Add a review by the acting user to a product.
    ///
    /// The review date is the server's current date at call time, never
    /// client-supplied. Score range validation is the route layer's job.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::ProductNotFound`] if the model is unknown (the
    /// review table is not touched in that case).
    /// Returns [`ReviewError::ExistingReview`] if the user already reviewed
    /// this product.
    pub async fn add_review(
        &self,
        model: &ProductModel,
        actor: &CurrentUser,
        score: u8,
        comment: &str,
    ) -> Result<(), ReviewError> {
        let product = self
            .products
            .get_by_model(model)
            .await?
            .ok_or(ReviewError::ProductNotFound)?;

        let date = Utc::now().date_naive();

        self.reviews
            .insert(product.id, &actor.username, score, date, comment)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ReviewError::ExistingReview,
                other => ReviewError::Storage(other),
            })
    }

    /// Get all reviews of a product, in insertion order.
    ///
    /// A product with zero reviews yields an empty list, never an error.
    /// Product existence is deliberately not checked here: an unknown model
    /// and a reviewless product are indistinguishable to callers, and
    /// changing that would alter observable behavior.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] only for a genuine storage fault.
    pub async fn product_reviews(
        &self,
        model: &ProductModel,
    ) -> Result<Vec<Review>, ReviewError> {
        Ok(self.reviews.list_by_model(model).await?)
    }

    /// Delete the acting user's review of a product.
    ///
    /// Three sequential steps: product existence check, membership check
    /// against the product's review list, then the delete. The membership
    /// check re-fetches the full list and searches it; a point lookup would
    /// do, but the three failure cases must stay distinguishable.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::ProductNotFound`] if the model is unknown.
    /// Returns [`ReviewError::NoReviewFound`] if the product exists but the
    /// actor has no review for it.
    pub async fn delete_review(
        &self,
        model: &ProductModel,
        actor: &CurrentUser,
    ) -> Result<(), ReviewError> {
        let product = self
            .products
            .get_by_model(model)
            .await?
            .ok_or(ReviewError::ProductNotFound)?;

        let reviews = self.reviews.list_by_model(model).await?;
        if !reviews.iter().any(|r| r.username == actor.username) {
            return Err(ReviewError::NoReviewFound);
        }

        // The row can only have vanished between the check and the delete;
        // report that the same way as a failed membership check.
        let deleted = self
            .reviews
            .delete_by_product_and_user(product.id, &actor.username)
            .await?;
        if !deleted {
            return Err(ReviewError::NoReviewFound);
        }

        Ok(())
    }

    /// Delete every review of a product (administrative cleanup, e.g. before
    /// the product itself is removed).
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::ProductNotFound`] if the model is unknown.
    pub async fn delete_reviews_of_product(
        &self,
        model: &ProductModel,
    ) -> Result<(), ReviewError> {
        let product = self
            .products
            .get_by_model(model)
            .await?
            .ok_or(ReviewError::ProductNotFound)?;

        self.reviews.delete_by_product(product.id).await?;

        Ok(())
    }

    /// Delete every review in the store (administrative reset).
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Storage`] if the bulk delete fails.
    pub async fn delete_all_reviews(&self) -> Result<(), ReviewError> {
        self.reviews.delete_all().await?;

        Ok(())
    }
}
