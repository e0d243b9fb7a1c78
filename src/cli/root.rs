use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{debug, info};

use super::page::PageCommand;
use crate::catalog::{ArticClient, PageFetcher};
use crate::config::Config;
use crate::{logging, tui};

/// artpicker - browse the museum catalog and keep favorites across pages
#[derive(Parser)]
#[command(
    name = "artpicker",
    version,
    about = "Browse a paginated artwork catalog and mark favorites across pages",
    long_about = r#"artpicker shows the Art Institute of Chicago catalog one page at a time.
Favorites are kept in memory while you page through the catalog.

Examples:
  artpicker                       # Start the interactive table
  artpicker page 3                # Print page 3 and exit
  artpicker page 3 --json         # Print page 3 as JSON
  artpicker --page-size 24        # Use larger pages"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Records per page
    #[arg(short = 's', long = "page-size", global = true)]
    pub page_size: Option<usize>,

    /// Catalog API base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a single page and print it
    Page(PageCommand),

    /// Print the effective configuration
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = Config::init().await?;
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config.validate()?;

        match &self.command {
            Some(Commands::Page(page_cmd)) => {
                logging::init_stderr(self.debug)?;
                debug!("Configuration initialized");
                let fetcher = build_fetcher(&config)?;
                page_cmd.execute(&config, &fetcher).await
            }
            Some(Commands::Config) => {
                logging::init_stderr(self.debug)?;
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            None => self.start_interactive_mode(&config).await,
        }
    }

    async fn start_interactive_mode(&self, config: &Config) -> Result<()> {
        let _log_guard = logging::init_file(&config.data_dir, self.debug)?;
        info!("Starting interactive mode");

        let fetcher = build_fetcher(config)?;
        tui::run(config, fetcher).await?;

        info!("Application finished");
        Ok(())
    }
}

fn build_fetcher(config: &Config) -> Result<PageFetcher> {
    let client = ArticClient::new(
        &config.base_url,
        config.fields.clone(),
        config.request_timeout(),
        &config.user_agent,
    )
    .context("failed to create HTTP client")?;
    Ok(PageFetcher::new(Arc::new(client)))
}
