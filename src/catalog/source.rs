//! Remote catalog seam

use async_trait::async_trait;

use super::errors::FetchResult;
use super::types::Page;

/// A paginated remote catalog.
///
/// `page_number` is 1-based. `limit` is a hint; the source decides how many
/// records it actually returns.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page_number: usize, limit: usize) -> FetchResult<Page>;

    /// Source name for logs
    fn name(&self) -> &str;
}
