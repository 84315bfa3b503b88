//! Product repository for database operations.
//!
//! The review coordinator only ever asks two things of the catalog: "does
//! this model exist" and "give me its row". Insert and delete exist for
//! seeding and administrative cleanup.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use tradepost_core::{ProductId, ProductModel};

use super::{RepositoryError, map_unique_violation};
use crate::models::product::{NewProduct, Product};

/// Raw product row as stored in `SQLite`.
///
/// The price is stored as decimal TEXT; `SQLite` has no decimal type and
/// REAL would lose cents.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    model: String,
    category: String,
    selling_price: String,
    arrival_date: NaiveDate,
    quantity: i64,
    details: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let model = ProductModel::parse(&row.model).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid product model in database: {e}"))
        })?;
        let selling_price = Decimal::from_str(&row.selling_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid selling price in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            model,
            category: row.category,
            selling_price,
            arrival_date: row.arrival_date,
            quantity: row.quantity,
            details: row.details,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new product row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the model already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, new_product: &NewProduct) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO products (model, category, selling_price, arrival_date, quantity, details) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new_product.model.as_str())
        .bind(&new_product.category)
        .bind(new_product.selling_price.to_string())
        .bind(new_product.arrival_date)
        .bind(new_product.quantity)
        .bind(new_product.details.as_deref())
        .execute(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product model already exists"))?;

        Ok(())
    }

    /// Get a product by its model.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_model(
        &self,
        model: &ProductModel,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, model, category, selling_price, arrival_date, quantity, details \
             FROM products WHERE model = ?",
        )
        .bind(model.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Check whether a product with the given model exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, model: &ProductModel) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM products WHERE model = ?)",
        )
        .bind(model.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Delete a product row by model.
    ///
    /// Reviews of the product go with it via `ON DELETE CASCADE`.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` if no such model exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_model(&self, model: &ProductModel) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE model = ?")
            .bind(model.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
