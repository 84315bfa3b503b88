//! Product domain types.
//!
//! Product CRUD is not exposed over HTTP by this binary; the catalog is
//! maintained out of band. These types exist because reviews reference
//! products and the review coordinator needs existence checks against them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use tradepost_core::{ProductId, ProductModel};

/// A catalog product (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Unique business key of the product.
    pub model: ProductModel,
    /// Product category (e.g. "Smartphone").
    pub category: String,
    /// Unit price.
    pub selling_price: Decimal,
    /// Date the product arrived in stock.
    pub arrival_date: NaiveDate,
    /// Units currently in stock.
    pub quantity: i64,
    /// Free-form description, if any.
    pub details: Option<String>,
}

/// Data required to insert a new product row.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Unique business key of the product.
    pub model: ProductModel,
    /// Product category.
    pub category: String,
    /// Unit price.
    pub selling_price: Decimal,
    /// Date the product arrived in stock.
    pub arrival_date: NaiveDate,
    /// Units in stock.
    pub quantity: i64,
    /// Free-form description, if any.
    pub details: Option<String>,
}
