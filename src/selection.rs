//! Cross-page favorite selection.
//!
//! The store keeps a single set of record identifiers that is independent of
//! whichever page is currently loaded. Rows derive their "selected" flag by
//! looking their id up here, so paging away and back never loses a selection
//! and never requires re-fetching old pages.

use std::collections::BTreeSet;
use tracing::debug;

use crate::catalog::RecordId;

/// Selection store for catalog records
#[derive(Debug, Default, Clone)]
pub struct SelectionStore {
    /// Currently selected identifiers
    selected: BTreeSet<RecordId>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove one identifier. Returns whether membership changed.
    pub fn set_selected(&mut self, id: RecordId, selected: bool) -> bool {
        let changed = if selected {
            self.selected.insert(id)
        } else {
            self.selected.remove(&id)
        };

        if changed {
            debug!(id, selected, "Selection changed");
        }
        changed
    }

    /// Add or remove exactly the given identifiers; everything else is left
    /// alone. Returns the number of memberships that changed.
    pub fn set_selected_all<I>(&mut self, ids: I, selected: bool) -> usize
    where
        I: IntoIterator<Item = RecordId>,
    {
        let changed = ids
            .into_iter()
            .filter(|id| {
                if selected {
                    self.selected.insert(*id)
                } else {
                    self.selected.remove(id)
                }
            })
            .count();

        debug!(changed, selected, total = self.selected.len(), "Bulk selection applied");
        changed
    }

    /// Union the first `n` identifiers of `ordered_ids` into the selection.
    ///
    /// `n` larger than the sequence selects all of it; `n == 0` is a no-op.
    pub fn select_top_n<I>(&mut self, ordered_ids: I, n: usize) -> usize
    where
        I: IntoIterator<Item = RecordId>,
    {
        if n == 0 {
            return 0;
        }
        self.set_selected_all(ordered_ids.into_iter().take(n), true)
    }

    /// Drop every selection
    pub fn clear(&mut self) -> usize {
        let cleared = self.selected.len();
        self.selected.clear();
        cleared
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected identifiers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.selected.iter().copied()
    }
}
