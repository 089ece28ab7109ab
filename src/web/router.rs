//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{download_file, share_qr, share_status, upload_file, AppState};
use super::middleware::create_cors_layer;
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Allow some slack over the configured limit for multipart framing;
    // the handler enforces the exact file size.
    let body_limit = app_state.max_upload_size as usize + 1024 * 1024;

    let api_routes = Router::new()
        .route("/upload", post(upload_file))
        .route("/files/:identity", get(share_status))
        .route("/files/:identity/download", get(download_file))
        .route("/files/:identity/qr", get(share_qr));

    Router::new()
        .nest("/api", api_routes)
        // Shareable links point here
        .route("/file/:identity", get(download_file))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
