//! Games HTTP Server.
//!
//! Read-only JSON endpoints over the cached VPS game database. Every data
//! route reads through the [`QueryService`]; a cache with no data on any
//! tier answers 503.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

use crate::domain::errors::CacheError;
use crate::domain::models::{Dataset, ServerConfig};
use crate::services::QueryService;

/// Configuration for the games HTTP server.
#[derive(Debug, Clone)]
pub struct GamesHttpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl From<&ServerConfig> for GamesHttpConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Cache failures rendered as HTTP responses.
struct ApiError(CacheError);

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match &self.0 {
            CacheError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable",
                "SERVICE_UNAVAILABLE",
            ),
            CacheError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "INTERNAL_ERROR",
            ),
        };
        error!(error = %self.0, status = status.as_u16(), "vpsData load failed");

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

/// Shared state for the games HTTP server.
struct AppState {
    service: QueryService,
}

/// Build the router over `service`.
pub fn build_router(service: QueryService, enable_cors: bool) -> Router {
    let state = Arc::new(AppState { service });

    let app = Router::new()
        .route("/", get(service_root))
        .route("/health", get(health_check))
        .route("/api", get(api_root))
        .route("/api/v1", get(api_v1_root))
        .route("/api/v1/", get(api_v1_root))
        .route("/api/v1/games", get(list_games))
        .route("/api/v1/games/{name}", get(games_by_name))
        .route("/api/v1/games/tables/{vps_id}", get(games_by_table))
        .with_state(state);

    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(trace)
    } else {
        app.layer(trace)
    }
}

/// Games HTTP Server.
pub struct GamesHttpServer {
    config: GamesHttpConfig,
    service: QueryService,
}

impl GamesHttpServer {
    /// Create a server for `service`.
    pub fn new(service: QueryService, config: GamesHttpConfig) -> Self {
        Self { config, service }
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = build_router(self.service, self.config.enable_cors);

        info!(%addr, "Games HTTP server listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// Handler functions

async fn service_root() -> &'static str {
    "VPS Data Service is up and running..."
}

async fn health_check() -> &'static str {
    "OK"
}

async fn api_root() -> &'static str {
    "VPS API Service is up and running..."
}

async fn api_v1_root() -> &'static str {
    "VPS API v1 Endpoint is available, try /api/v1/games."
}

async fn list_games(State(state): State<Arc<AppState>>) -> Result<Json<Arc<Dataset>>, ApiError> {
    Ok(Json(state.service.all_games().await?))
}

async fn games_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.service.games_by_name(&name).await?))
}

/// One match is returned bare, none as `{}`, several as an array.
async fn games_by_table(
    State(state): State<Arc<AppState>>,
    Path(vps_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut matches = state.service.games_by_table_id(&vps_id).await?;

    let body = match matches.len() {
        0 => json!({}),
        1 => matches.swap_remove(0),
        _ => Value::Array(matches),
    };
    Ok(Json(body))
}
