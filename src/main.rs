use anyhow::Context;
use clap::Parser;
use doc_rag::cli::{self, Cli, Command};
use doc_rag::config::AppConfig;
use doc_rag::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    match cli.command {
        Command::Serve => cli::serve::run(&config).await,
        Command::Ingest(args) => cli::ingest::run(&config, args).await,
        Command::Query(args) => cli::query::run(&config, args).await,
    }
}
