use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::category::{Category, CategoryInput};
use crate::repositories::category as category_repo;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Category not found".to_string())
}

/// Lists every category.
pub async fn list_categories(state: &AppState) -> Result<Vec<Category>> {
    let categories = category_repo::list(&state.db).await?;
    tracing::debug!("📂 Listed {} categories", categories.len());
    Ok(categories)
}

/// Fetches one category.
pub async fn get_category(state: &AppState, id: Uuid) -> Result<Category> {
    category_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(not_found)
}

/// Creates a category.
pub async fn create_category(state: &AppState, input: &CategoryInput) -> Result<Category> {
    let category = category_repo::create(
        &state.db,
        Uuid::new_v4(),
        input.name.trim(),
        input.description.trim(),
    )
    .await?;

    tracing::info!("✅ Category created: {} ({})", category.name, category.id);
    Ok(category)
}

/// Replaces a category's name and description.
pub async fn update_category(
    state: &AppState,
    id: Uuid,
    input: &CategoryInput,
) -> Result<Category> {
    let category = category_repo::update(
        &state.db,
        &id,
        input.name.trim(),
        input.description.trim(),
    )
    .await?
    .ok_or_else(not_found)?;

    tracing::info!("✅ Category updated: {}", category.id);
    Ok(category)
}

/// Deletes a category. Fails with a conflict while products still use it.
pub async fn delete_category(state: &AppState, id: Uuid) -> Result<()> {
    if !category_repo::delete(&state.db, &id).await? {
        return Err(not_found());
    }

    tracing::info!("🗑️ Category deleted: {}", id);
    Ok(())
}
