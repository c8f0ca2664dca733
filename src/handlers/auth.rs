use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::Result,
    models::admin::{AdminProfile, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    services::auth as auth_service,
    state::AppState,
    validation::auth::{validate_login, validate_register},
};

/// Handles admin registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt - Payload: {:?}", payload);
    validate_register(&payload)?;

    let admin = auth_service::register_admin(&state, &payload).await?;

    tracing::info!("✅ Admin registered: {}", admin.id);

    let response = RegisterResponse {
        message: "Admin registered successfully".to_string(),
        admin: AdminProfile::from(&admin),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles admin login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt - Payload: {:?}", payload);
    validate_login(&payload)?;

    let (admin, token) = auth_service::login_admin(&state, &payload).await?;

    tracing::info!("✅ Admin logged in: {}", admin.id);

    let response = LoginResponse {
        message: "Login successful".to_string(),
        token,
        admin: AdminProfile::from(&admin),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
