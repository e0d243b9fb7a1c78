use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use crate::catalog::{Page, PageFetcher, PageWindow};
use crate::config::Config;

/// Fetch a single page non-interactively
#[derive(Args)]
pub struct PageCommand {
    /// 1-based page number
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub number: u64,

    /// Print the page as JSON
    #[arg(long = "json")]
    pub json: bool,
}

impl PageCommand {
    pub async fn execute(&self, config: &Config, fetcher: &PageFetcher) -> Result<()> {
        debug!("Executing page command");

        let index = usize::try_from(self.number - 1).context("page number out of range")?;
        let window = PageWindow::for_page(index, config.page_size)?;
        info!("Fetching {}", window);

        let page = fetcher
            .fetch(window)
            .await
            .with_context(|| format!("failed to fetch {}", window))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&page)?);
        } else {
            print!("{}", format_page(&page, window));
        }

        Ok(())
    }
}

fn format_page(page: &Page, window: PageWindow) -> String {
    let total_pages = (page.total + window.size() - 1) / window.size();
    let mut out = format!(
        "Page {} of {} ({} records)\n",
        window.page_number(),
        total_pages.max(1),
        page.total
    );

    for record in &page.records {
        out.push_str(&format!(
            "{:>8}  {}  | {}  | {}\n",
            record.id,
            record.title,
            record.artist_display.lines().next().unwrap_or_default(),
            record.date_range()
        ));
    }

    out
}
