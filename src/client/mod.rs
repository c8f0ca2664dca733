//! Typed HTTP client for the admin REST API.

pub mod error;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use uuid::Uuid;

pub use error::{ApiError, GENERIC_ERROR_MESSAGE, format_error_message};

use crate::{
    config::ClientConfig,
    handlers::root::MessageResponse,
    models::{
        admin::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        category::{Category, CategoryInput},
        product::{Product, ProductInput},
    },
    session::{AuthTransport, TokenStore},
};

/// Client for the admin API.
///
/// Reads the current token from the shared store on every request and
/// sends it as a bearer credential, so a logout is reflected immediately.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Creates a client from configuration.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.load() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let value = serde_json::from_str::<serde_json::Value>(&body)
            .unwrap_or(serde_json::Value::String(body));
        let message = format_error_message(&value);

        tracing::debug!("API call failed with {}: {}", status, message);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Lists all products.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.send(self.authorized(self.http.get(self.url("products"))))
            .await
    }

    /// Fetches one product.
    pub async fn get_product(&self, id: Uuid) -> Result<Product, ApiError> {
        self.send(self.authorized(self.http.get(self.url(&format!("products/{id}")))))
            .await
    }

    /// Creates a product.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        self.send(self.authorized(self.http.post(self.url("products")).json(input)))
            .await
    }

    /// Replaces a product.
    pub async fn update_product(&self, id: Uuid, input: &ProductInput) -> Result<Product, ApiError> {
        self.send(
            self.authorized(self.http.put(self.url(&format!("products/{id}"))).json(input)),
        )
        .await
    }

    /// Deletes a product.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ApiError> {
        self.send::<MessageResponse>(
            self.authorized(self.http.delete(self.url(&format!("products/{id}")))),
        )
        .await
        .map(|_| ())
    }

    /// Lists all categories.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.send(self.authorized(self.http.get(self.url("categories"))))
            .await
    }

    /// Fetches one category.
    pub async fn get_category(&self, id: Uuid) -> Result<Category, ApiError> {
        self.send(self.authorized(self.http.get(self.url(&format!("categories/{id}")))))
            .await
    }

    /// Creates a category.
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.send(self.authorized(self.http.post(self.url("categories")).json(input)))
            .await
    }

    /// Replaces a category.
    pub async fn update_category(
        &self,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        self.send(
            self.authorized(self.http.put(self.url(&format!("categories/{id}"))).json(input)),
        )
        .await
    }

    /// Deletes a category.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ApiError> {
        self.send::<MessageResponse>(
            self.authorized(self.http.delete(self.url(&format!("categories/{id}")))),
        )
        .await
        .map(|_| ())
    }
}

#[async_trait]
impl AuthTransport for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send(self.http.post(self.url("admin/login")).json(credentials))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.send(self.http.post(self.url("admin/register")).json(request))
            .await
    }
}
