//! Row composition and selection commands for the catalog table.
//!
//! Rows are derived on every render by pairing the loaded records with the
//! selection store; nothing about selection is stored per record. The bulk
//! "select top N" popover keeps its own transient input here, separate from
//! the durable selection.

use tracing::debug;

use crate::catalog::{Record, RecordId};
use crate::selection::SelectionStore;

/// Upper bound on digits accepted by the bulk-select input
const MAX_INPUT_DIGITS: usize = 6;

/// A record paired with its derived selection flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowView<'a> {
    pub record: &'a Record,
    pub selected: bool,
}

/// Props consumed by the table renderer
#[derive(Debug, Clone)]
pub struct TableProps<'a> {
    pub rows: Vec<RowView<'a>>,
    pub loading: bool,
    pub total: usize,
    pub offset: usize,
    pub page_size: usize,
    pub all_selected: bool,
    pub selected_count: usize,
}

/// State of the "select top N" popover
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkSelect {
    open: bool,
    input: String,
}

impl BulkSelect {
    /// Open with an empty input
    pub fn open(&mut self) {
        self.open = true;
        self.input.clear();
    }

    /// Close and forget the input
    pub fn close(&mut self) {
        self.open = false;
        self.input.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_digit(&mut self, ch: char) {
        if self.open && ch.is_ascii_digit() && self.input.len() < MAX_INPUT_DIGITS {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// The requested count clamped to `[1, page_len]`; `None` when the input
    /// is empty, zero or the page is empty
    pub fn count(&self, page_len: usize) -> Option<usize> {
        let n: usize = self.input.parse().ok()?;
        if n == 0 || page_len == 0 {
            return None;
        }
        Some(n.min(page_len))
    }

    pub fn can_commit(&self, page_len: usize) -> bool {
        self.open && self.count(page_len).is_some()
    }
}

/// Binds the loaded page to the selection store
#[derive(Debug, Default)]
pub struct ViewBinder {
    pub bulk: BulkSelect,
}

impl ViewBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows<'a>(&self, records: &'a [Record], store: &SelectionStore) -> Vec<RowView<'a>> {
        records
            .iter()
            .map(|record| RowView {
                record,
                selected: store.is_selected(record.id),
            })
            .collect()
    }

    /// Whether every loaded record is selected; false for an empty page
    pub fn all_selected(&self, records: &[Record], store: &SelectionStore) -> bool {
        !records.is_empty() && records.iter().all(|r| store.is_selected(r.id))
    }

    pub fn toggle_row(&self, store: &mut SelectionStore, id: RecordId, selected: bool) -> bool {
        store.set_selected(id, selected)
    }

    /// Page-level toggle: select or deselect exactly the loaded records
    pub fn set_page_selected(
        &self,
        records: &[Record],
        store: &mut SelectionStore,
        selected: bool,
    ) -> usize {
        store.set_selected_all(page_ids(records), selected)
    }

    /// Flip the page-level toggle based on its current state
    pub fn toggle_page(&self, records: &[Record], store: &mut SelectionStore) -> usize {
        let on = !self.all_selected(records, store);
        self.set_page_selected(records, store, on)
    }

    /// Commit the popover: select the first N loaded records, then close and
    /// clear the input. Returns `None` without side effects when the input
    /// cannot be committed.
    pub fn commit_bulk(&mut self, records: &[Record], store: &mut SelectionStore) -> Option<usize> {
        if !self.bulk.is_open() {
            return None;
        }
        let n = self.bulk.count(records.len())?;
        let changed = store.select_top_n(page_ids(records), n);
        debug!(n, changed, "Committed top-N selection");
        self.bulk.close();
        Some(changed)
    }

    pub fn props<'a>(
        &self,
        records: &'a [Record],
        store: &SelectionStore,
        loading: bool,
        total: usize,
        offset: usize,
        page_size: usize,
    ) -> TableProps<'a> {
        TableProps {
            rows: self.rows(records, store),
            loading,
            total,
            offset,
            page_size,
            all_selected: self.all_selected(records, store),
            selected_count: store.len(),
        }
    }
}

fn page_ids(records: &[Record]) -> impl Iterator<Item = RecordId> + '_ {
    records.iter().map(|r| r.id)
}
