//! Translates page windows into single requests against a page source

use std::sync::Arc;
use tracing::{debug, warn};

use super::{
    errors::FetchResult,
    source::PageSource,
    types::{Page, PageWindow},
};

/// Issues exactly one source request per `fetch` call. Never retries.
#[derive(Clone)]
pub struct PageFetcher {
    source: Arc<dyn PageSource>,
}

impl PageFetcher {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, window: PageWindow) -> FetchResult<Page> {
        let page_number = window.page_number();
        debug!(
            source = self.source.name(),
            page_number,
            size = window.size(),
            "Requesting catalog page"
        );

        match self.source.fetch_page(page_number, window.size()).await {
            Ok(page) => {
                debug!(
                    page_number,
                    records = page.records.len(),
                    total = page.total,
                    "Catalog page received"
                );
                Ok(page)
            }
            Err(e) => {
                warn!(page_number, error = %e, "Catalog fetch failed");
                Err(e)
            }
        }
    }
}
