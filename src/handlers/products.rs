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
    models::product::ProductInput,
    services::products as product_service,
    state::AppState,
    validation::auth::report_message,
};

fn validate(input: &ProductInput) -> Result<()> {
    input
        .validate()
        .map_err(|report| AppError::Validation(report_message(&report)))
}

/// Lists all products with their categories.
pub async fn list_products(State(state): State<AppState>) -> Result<Response> {
    let products = product_service::list_products(&state).await?;
    Ok(Json(products).into_response())
}

/// Fetches a single product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Response> {
    let product = product_service::get_product(&state, product_id).await?;
    Ok(Json(product).into_response())
}

/// Creates a product.
#[axum::debug_handler]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessClaims>,
    Json(payload): Json<ProductInput>,
) -> Result<Response> {
    tracing::info!(
        "📦 Create product by admin: {} - name: {}, image: {} bytes",
        claims.id,
        payload.name,
        payload.image.len()
    );
    validate(&payload)?;

    let product = product_service::create_product(&state, &payload).await?;
    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// Replaces a product.
#[axum::debug_handler]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessClaims>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ProductInput>,
) -> Result<Response> {
    tracing::info!("📦 Update product {} by admin: {}", product_id, claims.id);
    validate(&payload)?;

    let product = product_service::update_product(&state, product_id, &payload).await?;
    Ok(Json(product).into_response())
}

/// Deletes a product.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(claims): Extension<AccessClaims>,
    Path(product_id): Path<Uuid>,
) -> Result<Response> {
    tracing::info!("🗑️ Delete product {} by admin: {}", product_id, claims.id);
    product_service::delete_product(&state, product_id).await?;

    Ok(Json(MessageResponse::new("Product deleted successfully")).into_response())
}
