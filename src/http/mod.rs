//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware pipeline)
//!     → json.rs (buffer & parse JSON bodies)
//!     → security layers (headers, rate limit)
//!     → health route or /api router
//! ```

pub mod json;
pub mod server;

pub use json::JsonBody;
pub use server::{AppState, HttpServer, HEALTH_MESSAGE};
