use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::admin::Admin,
};

/// A helper function to map a `tokio_postgres::Row` to an `Admin`.
fn row_to_admin(row: &Row) -> Result<Admin> {
    Ok(Admin {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        password: row.try_get("password").map_err(|_| AppError::MissingData("password".to_string()))?,
        token: row.try_get("token").map_err(|_| AppError::MissingData("token".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
        updated_at: row.try_get("updated_at").map_err(|_| AppError::MissingData("updated_at".to_string()))?,
    })
}

/// Creates a new admin in the database.
pub async fn create_admin(
    pool: &Pool,
    id: Uuid,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<Admin> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            INSERT INTO admins (id, username, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .await?;
    let row = client
        .query_one(&statement, &[&id, &username, &email, &password_hash])
        .await
        .map_err(|e| AppError::from_constraint(e, "Username or email already exists"))?;
    row_to_admin(&row)
}

/// Finds an admin by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<Admin>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached("SELECT * FROM admins WHERE email = $1")
        .await?;
    let row = client.query_opt(&statement, &[&email]).await?;
    row.map(|r| row_to_admin(&r)).transpose()
}

/// Finds an admin by their username.
pub async fn find_by_username(pool: &Pool, username: &str) -> Result<Option<Admin>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached("SELECT * FROM admins WHERE username = $1")
        .await?;
    let row = client.query_opt(&statement, &[&username]).await?;
    row.map(|r| row_to_admin(&r)).transpose()
}

/// Records the last token issued to an admin.
pub async fn update_token(pool: &Pool, admin_id: &Uuid, token: &str) -> Result<()> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            UPDATE admins
            SET token = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .await?;
    client.execute(&statement, &[&token, admin_id]).await?;
    Ok(())
}
