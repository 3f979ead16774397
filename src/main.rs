use std::path::PathBuf;

use clap::Parser;

use job_alert_backend::{config, lifecycle, observability};

#[derive(Parser)]
#[command(version, about = "Job alert backend: API server plus scraping/email scheduler")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env before anything reads the environment.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    observability::logging::init(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.server.port,
        "job-alert-backend starting"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
