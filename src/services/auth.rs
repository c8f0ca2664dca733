use uuid::Uuid;

use crate::crypto::password::{hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::models::admin::{Admin, LoginRequest, RegisterRequest};
use crate::repositories::admin as admin_repo;
use crate::state::AppState;

/// Registers a new admin.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The validated registration payload.
///
/// # Returns
///
/// A `Result` containing the created `Admin`.
pub async fn register_admin(state: &AppState, payload: &RegisterRequest) -> Result<Admin> {
    tracing::debug!("🔐 Registering admin: {}", payload.username);

    if admin_repo::find_by_username(&state.db, &payload.username).await?.is_some() {
        return Err(AppError::Validation("Username already exists".to_string()));
    }

    if admin_repo::find_by_email(&state.db, &payload.email).await?.is_some() {
        return Err(AppError::Validation("Email already exists".to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let admin = admin_repo::create_admin(
        &state.db,
        Uuid::new_v4(),
        &payload.username,
        &payload.email,
        &hashed_password,
    )
    .await?;

    tracing::info!("✅ Admin created with ID: {}", admin.id);
    Ok(admin)
}

/// Authenticates an admin and issues a token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The validated login payload.
///
/// # Returns
///
/// A `Result` containing the authenticated `Admin` and its new token.
pub async fn login_admin(state: &AppState, payload: &LoginRequest) -> Result<(Admin, String)> {
    tracing::debug!("🔐 Authenticating admin: {}", payload.email);

    let admin = admin_repo::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    if !verify_password(&payload.password, &admin.password)? {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let token = state.tokens.issue(admin.id)?;
    admin_repo::update_token(&state.db, &admin.id, &token).await?;

    tracing::info!("✅ Admin authenticated: {}", admin.id);
    Ok((admin, token))
}
