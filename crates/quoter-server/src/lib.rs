//! Quoter Web Server
//!
//! Axum-based REST API over the quote engine. The engine is loaded
//! once at startup and shared immutably; every handler is a pure
//! function of request plus engine state.
//!
//! - Restrictive CORS policy (same-origin unless origins are configured)
//! - Structured validation errors (400 with the offending fields)
//! - Artifact problems surface as 503, never as a partial quote
//! - Sanitized 500s: internals are logged, not returned

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use quoter_core::{Error as EngineError, QuoteEngine};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub engine: QuoteEngine,
    pub config: ServerConfig,
}

/// Build the application router around a loaded engine.
pub fn create_router(engine: QuoteEngine, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        engine,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Quoting
        .route("/quote", post(handlers::compute_quote))
        .route("/savings-tips", post(handlers::savings_tips))
        // Reference data
        .route("/brands", get(handlers::brand_comparison))
        .route("/model", get(handlers::model_metadata))
        // Liveness
        .route("/health", get(handlers::health));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided, otherwise answer the
    // root with service info
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    } else {
        app = app.route("/", get(handlers::service_info));
    }

    app
}

/// Start the server
pub async fn serve(
    engine: QuoteEngine,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(engine, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    /// Structured detail serialized alongside the message (e.g. the
    /// list of missing fields).
    detail: Option<serde_json::Value>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    /// Map an engine error onto the API contract: client-input errors
    /// become structured 400s, artifact/version problems become 503s,
    /// anything else is a sanitized 500.
    pub fn from_engine(err: EngineError) -> Self {
        match err {
            EngineError::MissingFields(fields) => Self {
                status: StatusCode::BAD_REQUEST,
                message: format!("missing required fields: {}", fields.join(", ")),
                detail: Some(serde_json::json!({ "missing": fields })),
                internal: None,
            },
            EngineError::UnknownCategory { field, value } => Self {
                status: StatusCode::BAD_REQUEST,
                message: format!("unknown value {value:?} for field '{field}'"),
                detail: Some(serde_json::json!({ "field": field, "value": value })),
                internal: None,
            },
            EngineError::InvalidField { field, reason } => Self {
                status: StatusCode::BAD_REQUEST,
                message: format!("invalid value for field '{field}': {reason}"),
                detail: Some(serde_json::json!({ "field": field })),
                internal: None,
            },
            err @ (EngineError::SchemaMismatch { .. } | EngineError::ArtifactLoad { .. }) => Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "quoting artifacts unavailable".to_string(),
                detail: None,
                internal: Some(err.into()),
            },
            err => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                detail: None,
                internal: Some(err.into()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let mut body = serde_json::json!({
            "error": self.message
        });
        if let Some(detail) = self.detail {
            body["detail"] = detail;
        }

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            detail: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
