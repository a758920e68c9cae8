//! careerctl - admin CLI for the careerd daemon.

use anyhow::Result;
use clap::Parser;

use careerctl::cli::{Cli, Commands};
use careerctl::client::CareerdClient;
use careerctl::{commands, display};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = CareerdClient::from_cli(&cli);

    let result = match cli.command {
        Commands::Career { action } => commands::career(&client, action).await,
        Commands::Step { action } => commands::step(&client, action).await,
        Commands::Progress { user_id } => commands::progress(&client, user_id).await,
        Commands::Sync => commands::sync(&client).await,
        Commands::Summary => commands::summary(&client).await,
        Commands::Health => commands::health(&client).await,
    };

    if let Err(e) = result {
        display::error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
