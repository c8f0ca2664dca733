use async_trait::async_trait;

use crate::{
    client::ApiError,
    models::admin::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
};

/// The credential exchange the session guard delegates to.
///
/// [`crate::client::ApiClient`] talks to the REST server; tests substitute a
/// scripted implementation.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;
}
