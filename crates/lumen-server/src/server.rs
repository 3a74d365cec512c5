use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use lumen_codes::CodeLookup;
use lumen_engine::SessionManager;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Server configuration.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<SessionManager>,
    pub codes: Arc<dyn CodeLookup>,
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/run-intention", post(handlers::run_intention))
        .route("/broadcast-scalar", post(handlers::broadcast_scalar))
        .route("/blessing", post(handlers::blessing))
        .route("/heartbeat", post(handlers::heartbeat))
        .route("/harmonize-space", post(handlers::harmonize_space))
        .route("/log-past-life-request", post(handlers::log_past_life_request))
        .route("/check-intention-status/{id}", get(handlers::check_status))
        .route("/stop-intention/{id}", post(handlers::stop_intention))
        .route("/get-healing-code", post(handlers::get_healing_code))
        .route("/remember-intention", post(handlers::remember_intention))
        .route("/recall-memory", get(handlers::recall_memory))
        .route("/analyze-patterns", get(handlers::analyze_patterns))
        .route("/suggest-ritual", post(handlers::suggest_ritual_handler))
        .route("/invoke-guidance", post(handlers::invoke_guidance))
        .route("/calculate-geometry", post(handlers::calculate_geometry))
}

/// Build the Axum router. Every route is also served under `/api`.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(routes())
        .nest("/api", routes())
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and start serving. Returns once the listener is bound.
pub async fn start(config: ServerConfig, state: AppState) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(state, Duration::from_secs(config.request_timeout_secs));
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(host = %config.host, port = local_addr.port(), "lumen server started");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "server exited");
        }
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        server,
    })
}

/// Handle returned by `start()`; keeps the serving task alive.
pub struct ServerHandle {
    pub port: u16,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Stop accepting connections.
    pub fn abort(&self) {
        self.server.abort();
    }
}
