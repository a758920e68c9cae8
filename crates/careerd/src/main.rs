use anyhow::Result;
use tracing::info;

use careerd::config::Config;
use careerd::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("careerd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    server::run(config).await
}
