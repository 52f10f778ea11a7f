//! In-memory address bar.

use tallyboard_interface::AddressBar;
use tracing::debug;

/// Address bar kept in memory, for headless use and tests.
///
/// Writes replace the current entry, so the history never grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryAddressBar {
    search: String,
    replacements: usize,
}

impl MemoryAddressBar {
    /// Start at the given query string.
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replacements: 0,
        }
    }

    /// Number of writes so far.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl AddressBar for MemoryAddressBar {
    fn search(&self) -> String {
        self.search.clone()
    }

    fn replace_search(&mut self, search: &str) {
        let search = search.strip_prefix('?').unwrap_or(search);
        debug!(search, "Replacing address bar query");
        self.search = search.to_string();
        self.replacements += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_overwrites_in_place() {
        let mut bar = MemoryAddressBar::new("?page=2");
        bar.replace_search("page=3");
        bar.replace_search("?page=4");
        assert_eq!(bar.search(), "page=4");
        assert_eq!(bar.replacements(), 2);
    }
}
