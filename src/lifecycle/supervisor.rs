//! Background task supervision.
//!
//! Detached work (database connect, scrape and digest loops) is spawned
//! through here instead of bare `tokio::spawn`, so a failure is visibly
//! discarded: exactly one error log naming the task, and the process keeps
//! running. Panics inside a task are contained the same way.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tokio::task::JoinHandle;

/// Spawn a task whose failure is logged rather than propagated.
pub fn spawn_supervised<F, E>(name: &'static str, task: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        match AssertUnwindSafe(task).catch_unwind().await {
            Ok(Ok(())) => tracing::debug!(task = name, "Background task finished"),
            Ok(Err(e)) => tracing::error!(task = name, error = %e, "Background task failed"),
            Err(_) => tracing::error!(task = name, "Background task panicked"),
        }
    })
}
