// Address Validity - Web Server
// REST API with Axum over the line processor

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use address_validity::{
    load_registry, AppConfig, GeoPoint, Geographic, LineProcessor, Registry, Street, TextConversion,
};

/// Environment variable pointing at the JSON configuration file
const CONFIG_ENV: &str = "ADDRESS_VALIDITY_CONFIG";

/// Shared application state
#[derive(Clone)]
struct AppState {
    processor: Arc<LineProcessor>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize + Default> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: T::default(),
            error: Some(message),
        }
    }
}

/// 404 envelope for a city code the registry does not know
fn unknown_city<T: Serialize + Default>(state: &AppState, city: u32) -> Option<Response> {
    if state.processor.registry().city(city).is_some() {
        return None;
    }
    let body = ApiResponse::<T>::error(format!("Unknown city code: {}", city));
    Some((StatusCode::NOT_FOUND, Json(body)).into_response())
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/cities/:prefix - Autocomplete city
async fn autocomplete_city(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(state.processor.registry().autocomplete_city(&prefix)))
}

/// GET /api/streets/:city/:prefix - Autocomplete street within a city
async fn autocomplete_street(
    State(state): State<AppState>,
    Path((city, prefix)): Path<(u32, String)>,
) -> Response {
    if let Some(response) = unknown_city::<Vec<Street>>(&state, city) {
        return response;
    }
    Json(ApiResponse::ok(
        state.processor.registry().autocomplete_street(city, &prefix),
    ))
    .into_response()
}

/// POST /api/check/:city - Check a document (plain text body)
async fn check_addresses(
    State(state): State<AppState>,
    Path(city): Path<u32>,
    body: String,
) -> Response {
    if let Some(response) = unknown_city::<TextConversion>(&state, city) {
        return response;
    }
    Json(ApiResponse::ok(state.processor.process_document(city, &body))).into_response()
}

/// POST /api/points/:city - Address points grouped by marker lines
async fn address_points(
    State(state): State<AppState>,
    Path(city): Path<u32>,
    body: String,
) -> Response {
    if let Some(response) = unknown_city::<Vec<Vec<GeoPoint>>>(&state, city) {
        return response;
    }
    Json(ApiResponse::ok(
        state.processor.group_points_by_marker(city, &body),
    ))
    .into_response()
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => AppConfig::default(),
    };

    let registry = load_registry(&config.registry_files, config.registry_encoding, &Geographic)?;
    let processor = LineProcessor::from_config(Arc::new(registry), &config);

    let state = AppState {
        processor: Arc::new(processor),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/cities/:prefix", get(autocomplete_city))
        .route("/streets/:city/:prefix", get(autocomplete_street))
        .route("/check/:city", post(check_addresses))
        .route("/points/:city", post(address_points))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind))?;

    info!(bind = %config.server.bind, "server running");

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
