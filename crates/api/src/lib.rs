// Memory Lane HTTP server
//
// Router assembly lives here so integration tests can drive the same app the
// binary serves.

pub mod api;
pub mod config;
pub mod openapi;
pub mod services;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use openapi::ApiDoc;
pub use services::TimelineService;
pub use storage::{DiskMediaStore, StorageBackend, UPLOADS_URL_PREFIX};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full application router
pub fn build_app(service: Arc<TimelineService>, config: &AppConfig) -> Router {
    let events_state = api::events::AppState::new(service);

    let app = Router::new()
        .route("/health", get(health))
        .merge(api::events::routes(events_state))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&config.upload_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    let app = app.layer(cors_layer(&config.cors_origins));

    // Add tracing
    app.layer(TraceLayer::new_for_http())
}

/// Any origin unless an allow-list is configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    tracing::info!(origins = ?origins, "CORS origins configured");
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
}
