use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::{category::Category, product::Product},
};

/// Products joined with their category, so every read returns it populated.
const SELECT_PRODUCT: &str = r#"
    SELECT p.id, p.name, p.price, p.description, p.image, p.created_at, p.updated_at,
           c.id AS category_id, c.name AS category_name, c.description AS category_description
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

const UNKNOWN_CATEGORY: &str = "Category does not exist";

/// A helper function to map a joined `tokio_postgres::Row` to a `Product`.
fn row_to_product(row: &Row) -> Result<Product> {
    Ok(Product {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        name: row.try_get("name").map_err(|_| AppError::MissingData("name".to_string()))?,
        price: row.try_get("price").map_err(|_| AppError::MissingData("price".to_string()))?,
        description: row.try_get("description").map_err(|_| AppError::MissingData("description".to_string()))?,
        image: row.try_get("image").map_err(|_| AppError::MissingData("image".to_string()))?,
        category: Category {
            id: row.try_get("category_id").map_err(|_| AppError::MissingData("category_id".to_string()))?,
            name: row.try_get("category_name").map_err(|_| AppError::MissingData("category_name".to_string()))?,
            description: row.try_get("category_description").map_err(|_| AppError::MissingData("category_description".to_string()))?,
        },
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        updated_at: row.try_get("updated_at").map_err(|_| AppError::MissingData("updated_at".to_string()))?,
    })
}

/// The fields written on insert and update.
pub struct ProductFields<'a> {
    pub name: &'a str,
    pub price: f64,
    pub description: &'a str,
    pub image: &'a str,
    pub category_id: Uuid,
}

/// Lists all products, newest first.
pub async fn list(pool: &Pool) -> Result<Vec<Product>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(&format!("{SELECT_PRODUCT} ORDER BY p.created_at DESC"))
        .await?;
    let rows = client.query(&statement, &[]).await?;
    rows.iter().map(row_to_product).collect()
}

/// Finds a product by its ID.
pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<Product>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(&format!("{SELECT_PRODUCT} WHERE p.id = $1"))
        .await?;
    let row = client.query_opt(&statement, &[id]).await?;
    row.map(|r| row_to_product(&r)).transpose()
}

/// Inserts a product and returns it with its category.
pub async fn create(pool: &Pool, id: Uuid, fields: &ProductFields<'_>) -> Result<Product> {
    {
        let client = pool.get().await?;
        let statement = client
            .prepare_cached(
                r#"
                INSERT INTO products (id, name, price, description, image, category_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .await?;
        client
            .execute(
                &statement,
                &[
                    &id,
                    &fields.name,
                    &fields.price,
                    &fields.description,
                    &fields.image,
                    &fields.category_id,
                ],
            )
            .await
            .map_err(|e| AppError::from_constraint(e, UNKNOWN_CATEGORY))?;
    }

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| AppError::Internal("Inserted product vanished".to_string()))
}

/// Replaces a product's fields. Returns `None` when no such product exists.
pub async fn update(pool: &Pool, id: &Uuid, fields: &ProductFields<'_>) -> Result<Option<Product>> {
    let affected = {
        let client = pool.get().await?;
        let statement = client
            .prepare_cached(
                r#"
                UPDATE products
                SET name = $2, price = $3, description = $4, image = $5,
                    category_id = $6, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .await?;
        client
            .execute(
                &statement,
                &[
                    id,
                    &fields.name,
                    &fields.price,
                    &fields.description,
                    &fields.image,
                    &fields.category_id,
                ],
            )
            .await
            .map_err(|e| AppError::from_constraint(e, UNKNOWN_CATEGORY))?
    };

    if affected == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

/// Deletes a product. Returns whether a row was removed.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached("DELETE FROM products WHERE id = $1")
        .await?;
    Ok(client.execute(&statement, &[id]).await? > 0)
}
