//! Per-client rate limiting middleware.
//!
//! Fixed window: each client address gets a counter that resets once the
//! window elapses. Request N within a window passes while N is at or below
//! the configured maximum; the first request past it is rejected with 429.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::config::RateLimitConfig;
use crate::observability::metrics;

// Stale entries are pruned once the map grows past this.
const PRUNE_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

/// Shared state for the rate limiter.
pub struct RateLimiterState {
    windows: Mutex<HashMap<IpAddr, Window>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
        }
    }

    /// Returns true if the request is allowed.
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }
}

/// Middleware enforcing the per-address request budget.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.check(addr.ip()) {
        next.run(request).await
    } else {
        tracing::warn!(client = %addr.ip(), "Rate limit exceeded");
        metrics::record_rate_limited();
        let mut response = Response::new(Body::from(
            "Too many requests, please try again later.",
        ));
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        response
    }
}
