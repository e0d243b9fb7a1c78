use anyhow::Result;
use clap::Parser;
use tracing::error;

mod catalog;
mod cli;
mod config;
mod logging;
mod pagination;
mod selection;
mod tui;
mod view;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Restore the terminal before reporting a panic
    std::panic::set_hook(Box::new(|panic_info| {
        tui::force_restore();
        error!("Application panicked: {}", panic_info);
        eprintln!("artpicker panicked: {}", panic_info);
        std::process::exit(1);
    }));

    // Load environment variables from .env file
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    if let Err(e) = execute().await {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn execute() -> Result<()> {
    let cli = Cli::parse();
    cli.execute().await
}
