//! Job Alert Backend
//!
//! An HTTP API over a jobs/subscribers database, plus a background
//! scheduler that scrapes job boards and sends email digests.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────┐
//!                   │               JOB ALERT BACKEND              │
//!                   │                                              │
//!   Client Request  │  ┌──────┐   ┌───────┐   ┌──────┐   ┌─────┐  │
//!   ────────────────┼─▶│ CORS │──▶│ JSON  │──▶│ sec. │──▶│rate │  │
//!                   │  └──────┘   │ body  │   │hdrs  │   │limit│  │
//!                   │             └───────┘   └──────┘   └──┬──┘  │
//!                   │                                       ▼     │
//!                   │                          ┌──────────────┐   │
//!                   │                          │ GET /  │ /api│   │
//!                   │                          └──────┬───────┘   │
//!                   │                                 ▼           │
//!                   │                          ┌──────────────┐   │
//!                   │                          │      db      │   │
//!                   │                          └──────────────┘   │
//!                   │                                 ▲           │
//!                   │  ┌───────────────────────────┐  │           │
//!                   │  │  scheduler (delayed start) │─┘           │
//!                   │  │  scrape loop │ digest loop │             │
//!                   │  └───────────────────────────┘              │
//!                   │                                              │
//!                   │  Cross-cutting: config, lifecycle/supervisor,│
//!                   │  observability, security                     │
//!                   └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod api;
pub mod config;
pub mod db;
pub mod http;
pub mod scheduler;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use http::{HttpServer, HEALTH_MESSAGE};
pub use lifecycle::run;
