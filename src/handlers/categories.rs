use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use garde::Validate;
use uuid::Uuid;

use crate::{
    crypto::jwt::AccessClaims,
    error::{AppError, Result},
    handlers::root::MessageResponse,
    models::category::CategoryInput,
    services::categories as category_service,
    state::AppState,
    validation::auth::report_message,
};

fn validate(input: &CategoryInput) -> Result<()> {
    input
        .validate()
        .map_err(|report| AppError::Validation(report_message(&report)))
}

/// Lists all categories.
pub async fn list_categories(State(state): State<AppState>) -> Result<Response> {
    let categories = category_service::list_categories(&state).await?;
    Ok(Json(categories).into_response())
}

/// Fetches a single category.
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<Response> {
    let category = category_service::get_category(&state, category_id).await?;
    Ok(Json(category).into_response())
}

/// Creates a category.
#[axum::debug_handler]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessClaims>,
    Json(payload): Json<CategoryInput>,
) -> Result<Response> {
    tracing::info!("📂 Create category by admin: {}", claims.id);
    validate(&payload)?;

    let category = category_service::create_category(&state, &payload).await?;
    Ok((StatusCode::CREATED, Json(category)).into_response())
}

/// Replaces a category.
#[axum::debug_handler]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessClaims>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryInput>,
) -> Result<Response> {
    tracing::info!("📂 Update category {} by admin: {}", category_id, claims.id);
    validate(&payload)?;

    let category = category_service::update_category(&state, category_id, &payload).await?;
    Ok(Json(category).into_response())
}

/// Deletes a category.
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessClaims>,
    Path(category_id): Path<Uuid>,
) -> Result<Response> {
    tracing::info!("🗑️ Delete category {} by admin: {}", category_id, claims.id);
    category_service::delete_category(&state, category_id).await?;

    Ok(Json(MessageResponse::new("Category deleted successfully")).into_response())
}
