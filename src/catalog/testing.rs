//! In-memory page source for tests

use async_trait::async_trait;
use std::sync::Mutex;

use super::{
    errors::{FetchError, FetchResult},
    source::PageSource,
    types::{Page, Record},
};

pub fn record(id: u64) -> Record {
    Record {
        id,
        title: format!("Artwork {}", id),
        place_of_origin: Some("France".to_string()),
        artist_display: format!("Artist {}", id),
        inscriptions: None,
        date_start: Some(1880),
        date_end: Some(1890),
    }
}

/// One test record per id, in the given order
pub fn records(ids: impl IntoIterator<Item = u64>) -> Vec<Record> {
    ids.into_iter().map(record).collect()
}

pub struct MemorySource {
    records: Vec<Record>,
    fail_status: Option<u16>,
    requests: Mutex<Vec<usize>>,
}

impl MemorySource {
    pub fn with_records(count: u64) -> Self {
        Self {
            records: records(1..=count),
            fail_status: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            records: Vec::new(),
            fail_status: Some(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<usize> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn fetch_page(&self, page_number: usize, limit: usize) -> FetchResult<Page> {
        self.requests.lock().unwrap().push(page_number);

        if let Some(status) = self.fail_status {
            return Err(FetchError::Status {
                status,
                body: "unavailable".to_string(),
            });
        }

        let start = (page_number - 1) * limit;
        let records = self.records.iter().skip(start).take(limit).cloned().collect();
        Ok(Page::new(records, self.records.len()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
