//! Runs against a live server (`cargo run` with a database behind it).
//! Ignored by default: `cargo test -- --ignored`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose};
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use shop_admin::{
    client::ApiClient,
    config::ClientConfig,
    intake::{ImageFile, ImageIntake},
    models::{
        admin::{LoginRequest, RegisterRequest},
        category::CategoryInput,
        product::ProductInput,
    },
    session::{MemoryTokenStore, SessionGuard, TokenStore},
};

static BASE_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000/api".to_string())
});

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
}

impl TestContext {
    fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.clone(),
        }
    }

    fn get_timestamp() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    }
}

/// A 1×1 PNG.
const PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_admin_registration_and_login() {
        let context = TestContext::new();
        let timestamp = TestContext::get_timestamp();
        let username = format!("admin_{}", timestamp);
        let email = format!("admin_{}@shop.test", timestamp);

        // Step 1: Admin Registration
        let reg_response = context
            .client
            .post(format!("{}/admin/register", context.base_url))
            .json(&json!({
                "username": username,
                "email": email,
                "password": "SecurePass123"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(reg_response.status().as_u16(), 201, "Registration failed");
        let reg_body: Value = reg_response.json().await.unwrap();
        assert_eq!(reg_body["message"], "Admin registered successfully");

        // Step 2: Duplicate username
        let dup_response = context
            .client
            .post(format!("{}/admin/register", context.base_url))
            .json(&json!({
                "username": username,
                "email": format!("other_{}@shop.test", timestamp),
                "password": "SecurePass123"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(dup_response.status().as_u16(), 400);
        let dup_body: Value = dup_response.json().await.unwrap();
        assert_eq!(dup_body["error"], "Username already exists");

        // Step 3: Wrong password
        let bad_login = context
            .client
            .post(format!("{}/admin/login", context.base_url))
            .json(&json!({ "email": email, "password": "WrongPass123" }))
            .send()
            .await
            .unwrap();

        assert_eq!(bad_login.status().as_u16(), 401);

        // Step 4: Admin Login
        let login_response = context
            .client
            .post(format!("{}/admin/login", context.base_url))
            .json(&json!({ "email": email, "password": "SecurePass123" }))
            .send()
            .await
            .unwrap();

        assert_eq!(login_response.status().as_u16(), 200, "Login failed");
        let login_body: Value = login_response.json().await.unwrap();
        assert_eq!(login_body["message"], "Login successful");
        assert_eq!(login_body["admin"]["username"], username);
        assert_eq!(login_body["token"].as_str().unwrap().split('.').count(), 3);
    }

    #[tokio::test]
    #[ignore]
    async fn test_catalog_through_the_admin_client() {
        let timestamp = TestContext::get_timestamp();
        let store = Arc::new(MemoryTokenStore::new());
        let config = ClientConfig {
            api_base_url: BASE_URL.clone(),
            ..ClientConfig::default()
        };
        let api = Arc::new(ApiClient::new(&config, store.clone()).unwrap());
        let guard = SessionGuard::new(store.clone(), api.clone());

        let email = format!("catalog_{}@shop.test", timestamp);
        guard
            .register(&RegisterRequest {
                username: format!("catalog_{}", timestamp),
                email: email.clone(),
                password: "SecurePass123".to_string(),
            })
            .await
            .unwrap();

        guard
            .login(&LoginRequest {
                email,
                password: "SecurePass123".to_string(),
            })
            .await
            .unwrap();
        assert!(guard.is_authenticated());

        let category = api
            .create_category(&CategoryInput {
                name: format!("Shoes {}", timestamp),
                description: "Footwear".to_string(),
            })
            .await
            .unwrap();

        let pixel = general_purpose::STANDARD.decode(PIXEL_PNG).unwrap();
        let image = ImageIntake::default()
            .accept(ImageFile::new("pixel.png", "image/png", pixel))
            .await
            .unwrap();

        let product = api
            .create_product(&ProductInput {
                name: "Sneaker".to_string(),
                price: 59.9,
                description: "Canvas sneaker".to_string(),
                image: image.payload().to_string(),
                category: category.id,
            })
            .await
            .unwrap();
        assert_eq!(product.category, category);

        let listed = api.list_products().await.unwrap();
        assert!(listed.iter().any(|p| p.id == product.id));

        // Category is still referenced.
        let err = api.delete_category(category.id).await.unwrap_err();
        assert_eq!(err.status(), Some(409));

        api.delete_product(product.id).await.unwrap();
        api.delete_category(category.id).await.unwrap();

        guard.logout();
        assert!(store.load().is_none());
        let err = api.list_categories().await;
        assert!(err.is_ok(), "reads stay public after logout");
        let err = api
            .create_category(&CategoryInput {
                name: "Denied".to_string(),
                description: "No token".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }
}
