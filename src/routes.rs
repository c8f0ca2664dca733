use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use http::{header, HeaderValue, Method};
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    error::{AppError, Result},
    handlers,
    middleware_layer::auth::require_auth,
    state::AppState,
};

/// Builds the CORS policy for the admin UI origin.
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| AppError::Internal(format!("Invalid CORS origin: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(86400)))
}

/// Builds the admin routes. Login and register are rate limited per peer IP,
/// so the router must be served with `ConnectInfo<SocketAddr>`.
fn admin_routes() -> Result<Router<AppState>> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .use_headers()
            .finish()
            .ok_or_else(|| AppError::Internal("Invalid rate limiter settings".to_string()))?,
    );

    Ok(Router::new()
        .route("/api/admin/register", post(handlers::auth::register))
        .route("/api/admin/login", post(handlers::auth::login))
        .layer(tower_governor::GovernorLayer::new(governor_conf)))
}

/// Builds the catalog routes. Reads are public, writes need a bearer token.
fn catalog_routes(state: &AppState) -> Router<AppState> {
    let auth = from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route(
            "/api/products",
            get(handlers::products::list_products)
                .merge(post(handlers::products::create_product).route_layer(auth.clone())),
        )
        .route(
            "/api/products/{product_id}",
            get(handlers::products::get_product).merge(
                put(handlers::products::update_product)
                    .delete(handlers::products::delete_product)
                    .route_layer(auth.clone()),
            ),
        )
        .route(
            "/api/categories",
            get(handlers::categories::list_categories)
                .merge(post(handlers::categories::create_category).route_layer(auth.clone())),
        )
        .route(
            "/api/categories/{category_id}",
            get(handlers::categories::get_category).merge(
                put(handlers::categories::update_category)
                    .delete(handlers::categories::delete_category)
                    .route_layer(auth),
            ),
        )
}

/// Assembles the full application router.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// A `Result` containing the `Router`, ready to serve.
pub fn router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.cors_origin)?;
    let body_limit = state.config.body_limit_bytes;

    let app = Router::new()
        .route("/", get(handlers::root::welcome))
        .merge(admin_routes()?)
        .merge(catalog_routes(&state))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors);

    Ok(app)
}
