use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::category::Category,
};

const DUPLICATE_NAME: &str = "A category with this name already exists";

/// A helper function to map a `tokio_postgres::Row` to a `Category`.
fn row_to_category(row: &Row) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        name: row.try_get("name").map_err(|_| AppError::MissingData("name".to_string()))?,
        description: row.try_get("description").map_err(|_| AppError::MissingData("description".to_string()))?,
    })
}

/// Lists all categories by name.
pub async fn list(pool: &Pool) -> Result<Vec<Category>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached("SELECT id, name, description FROM categories ORDER BY name")
        .await?;
    let rows = client.query(&statement, &[]).await?;
    rows.iter().map(row_to_category).collect()
}

/// Finds a category by its ID.
pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<Category>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached("SELECT id, name, description FROM categories WHERE id = $1")
        .await?;
    let row = client.query_opt(&statement, &[id]).await?;
    row.map(|r| row_to_category(&r)).transpose()
}

/// Inserts a category.
pub async fn create(pool: &Pool, id: Uuid, name: &str, description: &str) -> Result<Category> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description
            "#,
        )
        .await?;
    let row = client
        .query_one(&statement, &[&id, &name, &description])
        .await
        .map_err(|e| AppError::from_constraint(e, DUPLICATE_NAME))?;
    row_to_category(&row)
}

/// Replaces a category's fields. Returns `None` when no such category exists.
pub async fn update(
    pool: &Pool,
    id: &Uuid,
    name: &str,
    description: &str,
) -> Result<Option<Category>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            UPDATE categories
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .await?;
    let row = client
        .query_opt(&statement, &[id, &name, &description])
        .await
        .map_err(|e| AppError::from_constraint(e, DUPLICATE_NAME))?;
    row.map(|r| row_to_category(&r)).transpose()
}

/// Deletes a category. Returns whether a row was removed.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached("DELETE FROM categories WHERE id = $1")
        .await?;
    let affected = client
        .execute(&statement, &[id])
        .await
        .map_err(|e| AppError::from_constraint(e, "Category is still used by products"))?;
    Ok(affected > 0)
}
