//! Shared utilities for integration tests.

use std::time::Duration;

use job_alert_backend::config::AppConfig;

/// Config bound to a loopback port with a throwaway SQLite file and the
/// scheduler off. Tests opt back into the pieces they exercise.
pub fn test_config(port: u16, db_dir: &tempfile::TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;
    config.database.url = format!("sqlite:{}/app.db", db_dir.path().display());
    config.scheduler.enabled = false;
    config
}

/// Spawn the full bootstrap and give the listener a moment to come up.
pub async fn spawn_app(config: AppConfig) {
    tokio::spawn(async move {
        if let Err(e) = job_alert_backend::run(config).await {
            eprintln!("test server exited: {e}");
        }
    });
    tokio::time::sleep(Duration::from_millis(300)).await;
}

/// Poll `/api/status` until the fire-and-forget database connect lands.
#[allow(dead_code)]
pub async fn wait_for_db(client: &reqwest::Client, base: &str) {
    for _ in 0..30 {
        if let Ok(res) = client.get(format!("{base}/api/status")).send().await {
            if let Ok(body) = res.json::<serde_json::Value>().await {
                if body["database_connected"] == true {
                    return;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("database never connected");
}
