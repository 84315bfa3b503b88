//! Review repository for database operations.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use tradepost_core::{ProductId, ProductModel, ReviewId, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::review::Review;

/// Raw review row joined with its product's model.
#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    model: String,
    username: String,
    score: i64,
    review_date: NaiveDate,
    comment: String,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let model = ProductModel::parse(&row.model).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product model in database: {e}"))
        })?;
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let score = u8::try_from(row.score).map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid score in database: {}", row.score))
        })?;

        Ok(Self {
            id: ReviewId::new(row.id),
            model,
            username,
            score,
            date: row.review_date,
            comment: row.comment,
        })
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new review row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the (product, user) pair
    /// already has a review.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        product_id: ProductId,
        username: &Username,
        score: u8,
        date: NaiveDate,
        comment: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO reviews (product_id, username, score, review_date, comment) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product_id.as_i64())
        .bind(username.as_str())
        .bind(i64::from(score))
        .bind(date)
        .bind(comment)
        .execute(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "review already exists for this user and product"))?;

        Ok(())
    }

    /// Get all reviews of a product, in insertion order.
    ///
    /// A product with no reviews (or an unknown model) yields an empty list;
    /// "no rows" is not an error at this layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any stored row is invalid.
    pub async fn list_by_model(
        &self,
        model: &ProductModel,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, p.model, r.username, r.score, r.review_date, r.comment \
             FROM reviews r \
             JOIN products p ON p.id = r.product_id \
             WHERE p.model = ? \
             ORDER BY r.id",
        )
        .bind(model.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// Delete the review a user left on a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` if no such review exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_product_and_user(
        &self,
        product_id: ProductId,
        username: &Username,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE product_id = ? AND username = ?")
            .bind(product_id.as_i64())
            .bind(username.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every review of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_product(&self, product_id: ProductId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE product_id = ?")
            .bind(product_id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every review in the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews").execute(self.pool).await?;

        Ok(result.rows_affected())
    }
}
