//! Common types for the artwork catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::errors::{FetchError, FetchResult};

/// Page size used by the catalog when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Stable identifier of a catalog record
pub type RecordId = u64;

/// One artwork as returned by the remote catalog. Never mutated after fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist_display: String,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i32>,
    #[serde(default)]
    pub date_end: Option<i32>,
}

impl Record {
    /// Year span for display, e.g. `1890-1892` or `1890`
    pub fn date_range(&self) -> String {
        match (self.date_start, self.date_end) {
            (Some(start), Some(end)) if start == end => start.to_string(),
            (Some(start), Some(end)) => format!("{}-{}", start, end),
            (Some(year), None) | (None, Some(year)) => year.to_string(),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.title)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Slice of the catalog being requested or displayed.
///
/// `offset` is always a multiple of `size`, so a window always maps onto a
/// whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    offset: usize,
    size: usize,
}

impl PageWindow {
    /// Window for the 0-based page `index`
    pub fn for_page(index: usize, size: usize) -> FetchResult<Self> {
        if size == 0 {
            return Err(FetchError::InvalidWindow("page size must be positive".to_string()));
        }
        let offset = index
            .checked_mul(size)
            .ok_or_else(|| FetchError::InvalidWindow("page index out of range".to_string()))?;
        Ok(Self { offset, size })
    }

    /// Build a window from a raw offset, flooring it onto a page boundary
    pub fn from_offset(offset: usize, size: usize) -> FetchResult<Self> {
        if size == 0 {
            return Err(FetchError::InvalidWindow("page size must be positive".to_string()));
        }
        Ok(Self {
            offset: offset - offset % size,
            size,
        })
    }

    pub fn first(size: usize) -> FetchResult<Self> {
        Self::for_page(0, size)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 0-based page index
    pub fn index(&self) -> usize {
        self.offset / self.size
    }

    /// 1-based page number, as the remote source expects it
    pub fn page_number(&self) -> usize {
        self.index() + 1
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            offset: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} (offset {}, size {})", self.page_number(), self.offset, self.size)
    }
}

/// Page-change event as reported by a lazy table: `first` is the offset of
/// the first row, `rows` the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LazyPageEvent {
    pub first: usize,
    pub rows: usize,
}

impl TryFrom<LazyPageEvent> for PageWindow {
    type Error = FetchError;

    fn try_from(event: LazyPageEvent) -> FetchResult<Self> {
        PageWindow::from_offset(event.first, event.rows)
    }
}

/// A page of records plus the total size of the whole catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub records: Vec<Record>,
    pub total: usize,
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    pub fn new(records: Vec<Record>, total: usize) -> Self {
        Self {
            records,
            total,
            fetched_at: Utc::now(),
        }
    }
}
