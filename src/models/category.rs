use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The unique identifier for the category.
    pub id: Uuid,
    /// The category name, unique across categories.
    pub name: String,
    /// The category description.
    pub description: String,
}

/// The request payload for creating or replacing a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryInput {
    #[garde(length(min = 1, max = 200))]
    pub name: String,
    #[garde(length(min = 1, max = 2000))]
    pub description: String,
}
