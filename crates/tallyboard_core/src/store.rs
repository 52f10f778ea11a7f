//! Query state store with pagination-reset semantics.

use crate::{ParamValue, QueryDefaults, QueryState, SortOrder};
use tracing::{debug, instrument};

/// One user-driven change to a grid's query state.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryUpdate {
    /// Sort by a field; choosing the active field again flips the direction
    SortBy(String),
    /// Jump to a page (clamped to at least 1)
    Page(u32),
    /// Change rows per page (clamped to at least 1)
    PageSize(u32),
    /// Replace the filter expression
    Filter(String),
    /// Set one external parameter; an empty value removes it
    Param {
        /// Parameter key
        key: String,
        /// New value
        value: ParamValue,
    },
}

/// Owns the current [`QueryState`] of one grid instance.
///
/// Every mutation reports whether the state actually changed, which is the
/// signal the grid uses to re-fetch. Any change to a field other than the
/// page number resets the page to 1.
///
/// # Examples
///
/// ```
/// use tallyboard_core::{QueryDefaults, QueryStore, QueryUpdate, SortOrder};
///
/// let mut store = QueryStore::new(QueryDefaults::new("critValue"));
/// store.apply(QueryUpdate::Page(4));
///
/// // Re-selecting the active sort field flips the direction and rewinds.
/// assert!(store.apply(QueryUpdate::SortBy("critValue".into())));
/// assert_eq!(*store.state().order(), SortOrder::Ascending);
/// assert_eq!(*store.state().page(), 1);
/// ```
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct QueryStore {
    state: QueryState,
    defaults: QueryDefaults,
}

impl QueryStore {
    /// Create a store holding the default state.
    pub fn new(defaults: QueryDefaults) -> Self {
        Self {
            state: defaults.state(),
            defaults,
        }
    }

    /// Apply a single update.
    #[instrument(skip(self), level = "debug")]
    pub fn apply(&mut self, update: QueryUpdate) -> bool {
        self.update(|prev| {
            let next = prev.clone();
            match update {
                QueryUpdate::SortBy(field) => {
                    let order = if &field == prev.sort() {
                        prev.order().flipped()
                    } else {
                        SortOrder::Descending
                    };
                    next.with_sort(field).with_order(order)
                }
                QueryUpdate::Page(page) => next.with_page(page),
                QueryUpdate::PageSize(size) => next.with_size(size),
                QueryUpdate::Filter(filter) => next.with_filter(filter),
                QueryUpdate::Param { key, value } => next.with_external_param(key, value),
            }
        })
    }

    /// Functional update from the previous state.
    ///
    /// If the updater touched anything other than the page number, the page
    /// is forced back to 1 regardless of what the updater set.
    pub fn update<F>(&mut self, updater: F) -> bool
    where
        F: FnOnce(&QueryState) -> QueryState,
    {
        let mut next = updater(&self.state).normalized();
        if next.differs_beyond_page(&self.state) {
            next = next.with_page(1);
        }
        self.commit(next)
    }

    /// Replace the whole state without the pagination reset.
    ///
    /// Used when hydrating from the URL, where page and filter arrive together.
    pub fn replace(&mut self, state: QueryState) -> bool {
        self.commit(state.normalized())
    }

    /// Return to the defaults.
    pub fn reset(&mut self) -> bool {
        let defaults = self.defaults.state();
        self.commit(defaults)
    }

    fn commit(&mut self, next: QueryState) -> bool {
        if next == self.state {
            return false;
        }
        debug!(
            sort = %next.sort(),
            order = %next.order(),
            page = next.page(),
            size = next.size(),
            filter = %next.filter(),
            "Query state changed"
        );
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> QueryStore {
        QueryStore::new(QueryDefaults::new("critValue"))
    }

    #[test]
    fn test_new_sort_field_starts_descending() {
        let mut store = store();
        store.apply(QueryUpdate::SortBy("critValue".into()));
        assert_eq!(*store.state().order(), SortOrder::Ascending);

        store.apply(QueryUpdate::SortBy("stats.critRate".into()));
        assert_eq!(store.state().sort(), "stats.critRate");
        assert_eq!(*store.state().order(), SortOrder::Descending);
    }

    #[test]
    fn test_same_filter_is_not_a_change() {
        let mut store = store();
        assert!(store.apply(QueryUpdate::Filter("[a]1".into())));
        store.apply(QueryUpdate::Page(3));
        assert!(!store.apply(QueryUpdate::Filter("[a]1".into())));
        assert_eq!(*store.state().page(), 3);
    }

    #[test]
    fn test_page_zero_is_clamped() {
        let mut store = store();
        store.apply(QueryUpdate::Page(5));
        store.apply(QueryUpdate::Page(0));
        assert_eq!(*store.state().page(), 1);
    }

    #[test]
    fn test_replace_keeps_page() {
        let mut store = store();
        let hydrated = store.defaults().state().with_filter("[a]1").with_page(7);
        assert!(store.replace(hydrated));
        assert_eq!(*store.state().page(), 7);
    }
}
