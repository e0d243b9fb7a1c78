//! Remote artwork catalog: record types, the page source seam and the
//! fetcher that maps page windows onto requests.

pub mod artic;
pub mod errors;
pub mod fetcher;
pub mod source;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use artic::ArticClient;
pub use errors::*;
pub use fetcher::PageFetcher;
pub use source::PageSource;
pub use types::*;
