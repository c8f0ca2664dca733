use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::intake::data_url::decode_data_url;
use crate::models::product::{Product, ProductInput};
use crate::repositories::{category as category_repo, product as product_repo};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

/// Checks that `image` is a base64 data URL whose payload really is an image.
///
/// The declared MIME type must be `image/*` and the decoded bytes must sniff
/// as an image, so a renamed PDF is refused.
pub fn validate_image_data_url(image: &str) -> Result<()> {
    let (mime_type, bytes) = decode_data_url(image)
        .map_err(|e| AppError::Validation(format!("Invalid image: {}", e)))?;

    if !mime_type.starts_with("image/") {
        return Err(AppError::Validation(format!(
            "Invalid image: unsupported type {}",
            mime_type
        )));
    }

    if !infer::is_image(&bytes) {
        tracing::warn!("❌ Image payload does not match its declared type {}", mime_type);
        return Err(AppError::Validation(
            "Invalid image: payload is not an image".to_string(),
        ));
    }

    Ok(())
}

async fn check_input(state: &AppState, input: &ProductInput) -> Result<()> {
    validate_image_data_url(&input.image)?;

    if category_repo::find_by_id(&state.db, &input.category).await?.is_none() {
        return Err(AppError::Validation("Category does not exist".to_string()));
    }

    Ok(())
}

fn fields(input: &ProductInput) -> product_repo::ProductFields<'_> {
    product_repo::ProductFields {
        name: input.name.trim(),
        price: input.price,
        description: input.description.trim(),
        image: &input.image,
        category_id: input.category,
    }
}

/// Lists every product with its category.
pub async fn list_products(state: &AppState) -> Result<Vec<Product>> {
    let products = product_repo::list(&state.db).await?;
    tracing::debug!("📦 Listed {} products", products.len());
    Ok(products)
}

/// Fetches one product with its category.
pub async fn get_product(state: &AppState, id: Uuid) -> Result<Product> {
    product_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or_else(not_found)
}

/// Creates a product.
pub async fn create_product(state: &AppState, input: &ProductInput) -> Result<Product> {
    check_input(state, input).await?;

    let product = product_repo::create(&state.db, Uuid::new_v4(), &fields(input)).await?;

    tracing::info!("✅ Product created: {} ({})", product.name, product.id);
    Ok(product)
}

/// Replaces every field of a product.
pub async fn update_product(state: &AppState, id: Uuid, input: &ProductInput) -> Result<Product> {
    check_input(state, input).await?;

    let product = product_repo::update(&state.db, &id, &fields(input))
        .await?
        .ok_or_else(not_found)?;

    tracing::info!("✅ Product updated: {}", product.id);
    Ok(product)
}

/// Deletes a product.
pub async fn delete_product(state: &AppState, id: Uuid) -> Result<()> {
    if !product_repo::delete(&state.db, &id).await? {
        return Err(not_found());
    }

    tracing::info!("🗑️ Product deleted: {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::data_url::encode_data_url;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn accepts_image_payload() {
        let url = encode_data_url("image/png", PNG_MAGIC);
        assert!(validate_image_data_url(&url).is_ok());
    }

    #[test]
    fn rejects_non_image_mime_type() {
        let url = encode_data_url("application/pdf", b"%PDF-1.4\n");
        assert!(matches!(
            validate_image_data_url(&url),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_payload_that_is_not_an_image() {
        let url = encode_data_url("image/png", b"%PDF-1.4\n");
        assert!(matches!(
            validate_image_data_url(&url),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_plain_urls() {
        assert!(validate_image_data_url("https://example.com/a.png").is_err());
    }
}
