//! Review domain types.

use chrono::NaiveDate;
use serde::Serialize;

use tradepost_core::{ProductModel, ReviewId, Username};

/// A product review (domain type).
///
/// A user may hold at most one review per product; reviews are created and
/// deleted, never edited in place.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    /// Unique review ID.
    pub id: ReviewId,
    /// Model of the reviewed product.
    pub model: ProductModel,
    /// Author of the review.
    pub username: Username,
    /// Score, 1 to 5 inclusive.
    pub score: u8,
    /// Date the review was written, assigned by the server at creation.
    pub date: NaiveDate,
    /// Review text.
    pub comment: String,
}
