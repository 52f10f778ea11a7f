//! Pagination view model.

use crate::Row;
use serde::Serialize;

/// What the pagination controls and the table body need to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// One-based current page
    page: u32,
    /// Rows per page
    size: u32,
    /// Total rows in the collection, once counted
    total_rows: u64,
    /// Fetched rows on this page, expansion rows excluded
    real_rows: usize,
    /// Whether a row fetch is running
    loading: bool,
}

impl PageView {
    /// Build the view for a display row list.
    pub fn new(page: u32, size: u32, total_rows: u64, rows: &[Row], loading: bool) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
            total_rows,
            real_rows: rows.iter().filter(|row| !row.is_expand_row()).count(),
            loading,
        }
    }

    /// Number of pages, at least 1.
    pub fn page_count(&self) -> u64 {
        self.total_rows.div_ceil(u64::from(self.size)).max(1)
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.page_count()
    }

    /// The empty-state message should show.
    pub fn no_data(&self) -> bool {
        self.real_rows == 0 && !self.loading
    }

    /// Blank rows that keep the table height stable on a short last page.
    ///
    /// Only padded when the collection spans at least a full page.
    pub fn filler_rows(&self) -> usize {
        if self.total_rows < u64::from(self.size) {
            return 0;
        }
        (self.size as usize).saturating_sub(self.real_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn rows(count: usize) -> Vec<Row> {
        (0..count)
            .map(|i| Row::new(i.to_string().as_str(), Map::new()))
            .collect()
    }

    #[test]
    fn test_page_count_rounds_up() {
        let view = PageView::new(1, 20, 41, &rows(20), false);
        assert_eq!(view.page_count(), 3);
        assert!(view.has_next());
        assert!(!view.has_previous());
    }

    #[test]
    fn test_filler_ignores_expansion_rows() {
        let mut page = rows(5);
        let sibling = page[0].expansion();
        page.insert(1, sibling);
        let view = PageView::new(3, 20, 45, &page, false);
        assert_eq!(*view.real_rows(), 5);
        assert_eq!(view.filler_rows(), 15);
    }

    #[test]
    fn test_no_filler_for_small_collections() {
        let view = PageView::new(1, 20, 7, &rows(7), false);
        assert_eq!(view.filler_rows(), 0);
    }

    #[test]
    fn test_no_data_waits_for_loading() {
        assert!(!PageView::new(1, 20, 0, &[], true).no_data());
        assert!(PageView::new(1, 20, 0, &[], false).no_data());
    }
}
