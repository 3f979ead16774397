//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Shared state → fire DB connect → bind listener → confirm →
//!     schedule delayed scheduler start → serve
//!
//! Supervision (supervisor.rs):
//!     Detached task fails/panics → one structured error log → process continues
//!
//! Shutdown:
//!     Ctrl+C → axum graceful shutdown → run() returns
//! ```

pub mod startup;
pub mod supervisor;

pub use startup::{run, StartupError};
pub use supervisor::spawn_supervised;
