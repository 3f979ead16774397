//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP window budget)
//!     → Pass to routing
//! Outgoing response:
//!     → headers.rs (attach hardening headers)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a client over budget gets 429, nothing else runs
//! - Rate limit keyed by client address only; no trust in client headers

pub mod headers;
pub mod rate_limit;

pub use headers::security_headers_middleware;
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
