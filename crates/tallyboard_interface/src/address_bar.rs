//! The URL surface a grid projects its query state onto.

/// Holder of the current query string.
///
/// Writes replace the current history entry instead of pushing a new one.
pub trait AddressBar: Send {
    /// Current query string, with or without a leading `?`.
    fn search(&self) -> String;

    /// Replace the query string (without a leading `?`; empty clears it).
    fn replace_search(&mut self, search: &str);
}
