//! Merge fetched rows with the expanded-row overlay.

use crate::{ExpandedRows, Row};

/// Derive the display row list from fetched rows and the expanded set.
///
/// Synthetic expansion rows already present in `rows` are discarded first, so
/// feeding the output back in with the same expanded set yields the same
/// list. For each expanded identifier, in expansion order, a shallow copy
/// tagged as an expansion row is inserted directly after the original.
/// Identifiers that are not on the current page are skipped.
///
/// # Examples
///
/// ```
/// use serde_json::Map;
/// use tallyboard_core::{ExpandedRows, Row, RowId, reconcile};
///
/// let rows: Vec<Row> = ["a", "b", "c"].iter().map(|id| Row::new(*id, Map::new())).collect();
/// let expanded: ExpandedRows = [RowId::from("b")].into_iter().collect();
///
/// let display = reconcile(&rows, &expanded);
/// let shape: Vec<(&str, bool)> = display
///     .iter()
///     .map(|row| (row.id().as_str(), row.is_expand_row()))
///     .collect();
/// assert_eq!(shape, vec![("a", false), ("b", false), ("b", true), ("c", false)]);
/// ```
pub fn reconcile(rows: &[Row], expanded: &ExpandedRows) -> Vec<Row> {
    let mut display: Vec<Row> = rows
        .iter()
        .filter(|row| !row.is_expand_row())
        .cloned()
        .collect();

    for id in expanded.iter() {
        let Some(index) = display
            .iter()
            .position(|row| !row.is_expand_row() && row.id() == id)
        else {
            continue;
        };
        let sibling = display[index].expansion();
        display.insert(index + 1, sibling);
    }

    display
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RowId;
    use serde_json::Map;

    fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter().map(|id| Row::new(*id, Map::new())).collect()
    }

    fn shape(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|row| {
                if row.is_expand_row() {
                    format!("{}'", row.id())
                } else {
                    row.id().to_string()
                }
            })
            .collect()
    }

    #[test]
    fn test_expansion_follows_expansion_order() {
        let expanded: ExpandedRows = [RowId::from("c"), RowId::from("a")].into_iter().collect();
        let display = reconcile(&rows(&["a", "b", "c"]), &expanded);
        assert_eq!(shape(&display), vec!["a", "a'", "b", "c", "c'"]);
    }

    #[test]
    fn test_missing_ids_are_skipped() {
        let expanded: ExpandedRows = [RowId::from("gone"), RowId::from("b")].into_iter().collect();
        let display = reconcile(&rows(&["a", "b"]), &expanded);
        assert_eq!(shape(&display), vec!["a", "b", "b'"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let expanded: ExpandedRows = [RowId::from("a"), RowId::from("b")].into_iter().collect();
        let once = reconcile(&rows(&["a", "b", "c"]), &expanded);
        let twice = reconcile(&once, &expanded);
        assert_eq!(once, twice);
        assert_eq!(twice.iter().filter(|row| row.is_expand_row()).count(), 2);
    }

    #[test]
    fn test_empty_expanded_set_returns_rows() {
        let display = reconcile(&rows(&["a", "b"]), &ExpandedRows::new());
        assert_eq!(shape(&display), vec!["a", "b"]);
    }
}
