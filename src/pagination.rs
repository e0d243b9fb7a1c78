//! Lazy pagination controller.
//!
//! The controller owns the current page window, the catalog total, the
//! loading flag and the records of the one page held in memory. Paging
//! actions produce a [`FetchTicket`]; the caller runs the fetch and hands the
//! resolution back through [`PaginationController::apply`]. A resolution whose
//! window is no longer current is discarded, so a slow earlier request never
//! overwrites a faster later one.

use tracing::{debug, info, warn};

use crate::catalog::{FetchError, FetchResult, LazyPageEvent, Page, PageWindow, Record};

/// Tag carried by every in-flight fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub window: PageWindow,
}

/// What `apply` did with a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Records and total were replaced
    Applied,
    /// The fetch failed; previous records are kept
    Failed,
    /// The resolution belongs to a window that is no longer current
    Stale,
}

#[derive(Debug)]
pub struct PaginationController {
    window: PageWindow,
    total: usize,
    loading: bool,
    records: Vec<Record>,
    last_error: Option<String>,
    /// Sequence number of the most recently issued ticket
    latest_seq: u64,
    /// Whether a fetch has been issued for `window`
    requested: bool,
}

impl PaginationController {
    pub fn new(page_size: usize) -> FetchResult<Self> {
        Ok(Self {
            window: PageWindow::first(page_size)?,
            total: 0,
            loading: false,
            records: Vec::new(),
            last_error: None,
            latest_seq: 0,
            requested: false,
        })
    }

    /// Issue the initial fetch. Only the first call produces a ticket.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        if self.requested {
            return None;
        }
        Some(self.issue())
    }

    /// Move to `window`. Returns `None` when that window is already current
    /// and has been requested.
    pub fn go_to_page(&mut self, window: PageWindow) -> Option<FetchTicket> {
        if self.requested && window == self.window {
            debug!(%window, "Window unchanged, no fetch issued");
            return None;
        }
        self.window = window;
        Some(self.issue())
    }

    /// Handle a `{first, rows}` event from the table
    pub fn on_page_event(&mut self, event: LazyPageEvent) -> FetchResult<Option<FetchTicket>> {
        let window = PageWindow::try_from(event)?;
        Ok(self.go_to_page(window))
    }

    /// Re-request the current window
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Apply a fetch resolution.
    ///
    /// Only a resolution for the current window touches state. The loading
    /// flag clears only once the latest issued ticket resolves.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Page, FetchError>) -> ApplyOutcome {
        if ticket.window != self.window {
            debug!(
                seq = ticket.seq,
                stale = %ticket.window,
                current = %self.window,
                "Discarding stale page"
            );
            return ApplyOutcome::Stale;
        }

        if ticket.seq == self.latest_seq {
            self.loading = false;
        }

        match result {
            Ok(page) => {
                info!(
                    page_number = ticket.window.page_number(),
                    records = page.records.len(),
                    total = page.total,
                    "Page loaded"
                );
                self.records = page.records;
                self.total = page.total;
                self.last_error = None;
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!(page_number = ticket.window.page_number(), error = %e, "Keeping previous page");
                self.last_error = Some(e.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.requested = true;
        self.loading = true;
        let ticket = FetchTicket {
            seq: self.latest_seq,
            window: self.window,
        };
        debug!(seq = ticket.seq, window = %ticket.window, "Fetch issued");
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::records;
    use crate::selection::SelectionStore;

    fn window(index: usize) -> PageWindow {
        PageWindow::for_page(index, 12).unwrap()
    }

    fn page(ids: std::ops::RangeInclusive<u64>, total: usize) -> Page {
        Page::new(records(ids), total)
    }

    fn ids(controller: &PaginationController) -> Vec<u64> {
        controller.records().iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_mount_fetches_once() {
        let mut controller = PaginationController::new(12).unwrap();
        assert!(!controller.is_loading());

        let ticket = controller.mount().unwrap();
        assert_eq!(ticket.window, window(0));
        assert!(controller.is_loading());

        assert!(controller.mount().is_none());
        assert!(controller.go_to_page(window(0)).is_none());
    }

    #[test]
    fn test_success_replaces_records() {
        let mut controller = PaginationController::new(12).unwrap();
        let ticket = controller.mount().unwrap();

        let outcome = controller.apply(ticket, Ok(page(1..=12, 100)));

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert!(!controller.is_loading());
        assert_eq!(controller.total(), 100);
        assert_eq!(ids(&controller), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_failure_keeps_previous_page() {
        let mut controller = PaginationController::new(12).unwrap();
        let first = controller.mount().unwrap();
        controller.apply(first, Ok(page(1..=12, 100)));

        let second = controller.go_to_page(window(1)).unwrap();
        assert!(controller.is_loading());
        let outcome = controller.apply(
            second,
            Err(FetchError::Status {
                status: 500,
                body: "boom".to_string(),
            }),
        );

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(!controller.is_loading());
        assert_eq!(ids(&controller), (1..=12).collect::<Vec<_>>());
        assert!(controller.last_error().unwrap().contains("500"));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut controller = PaginationController::new(12).unwrap();
        let initial = controller.mount().unwrap();
        controller.apply(initial, Ok(page(1..=12, 100)));

        let a = controller.go_to_page(window(1)).unwrap();
        let b = controller.go_to_page(window(2)).unwrap();

        // B resolves first, then the slow A
        assert_eq!(controller.apply(b, Ok(page(25..=36, 100))), ApplyOutcome::Applied);
        assert_eq!(controller.apply(a, Ok(page(13..=24, 100))), ApplyOutcome::Stale);

        assert_eq!(controller.window(), window(2));
        assert_eq!(ids(&controller), (25..=36).collect::<Vec<_>>());
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_older_ticket_for_same_window_keeps_loading() {
        let mut controller = PaginationController::new(12).unwrap();
        let first = controller.mount().unwrap();
        let refresh = controller.refresh();

        assert_eq!(controller.apply(first, Ok(page(1..=12, 100))), ApplyOutcome::Applied);
        assert!(controller.is_loading());

        controller.apply(refresh, Ok(page(1..=12, 100)));
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_page_event_is_normalized() {
        let mut controller = PaginationController::new(12).unwrap();
        controller.mount();

        let ticket = controller
            .on_page_event(LazyPageEvent { first: 12, rows: 12 })
            .unwrap()
            .unwrap();
        assert_eq!(ticket.window, window(1));

        assert!(controller
            .on_page_event(LazyPageEvent { first: 13, rows: 12 })
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_round_trip_keeps_selection() {
        let mut controller = PaginationController::new(12).unwrap();
        let mut store = SelectionStore::new();

        let first = controller.go_to_page(window(0)).unwrap();
        controller.apply(first, Ok(page(1..=12, 100)));
        store.set_selected(2, true);
        store.set_selected(5, true);

        let second = controller.go_to_page(window(1)).unwrap();
        controller.apply(second, Ok(page(13..=24, 100)));
        store.set_selected(20, true);

        let back = controller.go_to_page(window(0)).unwrap();
        controller.apply(back, Ok(page(1..=12, 100)));

        assert!(store.is_selected(2));
        assert!(store.is_selected(5));
        assert!(store.is_selected(20));
        assert_eq!(store.len(), 3);
    }
}
