//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the health route and the `/api` router
//! - Wire up middleware in the contracted order
//! - Serve on a listener owned by the bootstrap
//!
//! # Middleware order
//! The request pipeline is an observable contract: CORS runs first, then
//! JSON body parsing, then security headers, then rate limiting, then
//! routing. Axum applies the last-added layer outermost, so layers are
//! attached in reverse below.

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method, Request,
    },
    middleware,
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::AppConfig;
use crate::db::Database;
use crate::http::json::parse_json_body;
use crate::observability::metrics;
use crate::security::{rate_limit_middleware, security_headers_middleware, RateLimiterState};

/// Fixed health-check body, served from `/` for uptime probes.
pub const HEALTH_MESSAGE: &str = "Job Alert Backend is running";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub scheduler_started: Arc<AtomicBool>,
}

/// HTTP server for the job alert backend.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/", get(health))
            .nest("/api", api::router(state));

        // Innermost layers first: rate limiting sits closest to routing.
        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        if config.security.enable_headers {
            router = router.layer(middleware::from_fn(security_headers_middleware));
        }

        router
            .layer(middleware::from_fn_with_state(
                config.security.max_body_size,
                parse_json_body,
            ))
            .layer(cors_layer())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(middleware::from_fn(track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Health probe. No dependencies on database or scheduler state.
async fn health() -> &'static str {
    HEALTH_MESSAGE
}

async fn track_requests(request: Request<Body>, next: axum::middleware::Next) -> Response {
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16());
    response
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
