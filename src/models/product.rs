use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// Represents a product with its category populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The unique identifier for the product.
    pub id: Uuid,
    /// The product name.
    pub name: String,
    /// The unit price.
    pub price: f64,
    /// The product description.
    pub description: String,
    /// The product image as a `data:image/...;base64,` URL.
    pub image: String,
    /// The category the product belongs to.
    pub category: Category,
    /// The timestamp when the product was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The request payload for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductInput {
    #[garde(length(min = 1, max = 300))]
    pub name: String,
    #[garde(range(min = 0.0))]
    pub price: f64,
    #[garde(length(min = 1, max = 5000))]
    pub description: String,
    #[garde(length(min = 1))]
    pub image: String,
    #[garde(skip)]
    pub category: Uuid,
}
