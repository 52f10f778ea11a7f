//! Transport seam for remote collections.

use async_trait::async_trait;
use tallyboard_core::{CollectionPage, CollectionRequest, CountRequest, FilterOptionGroup};
use tallyboard_error::TallyboardResult;

/// A remote store of paginated collections.
///
/// Implementations must not retry on their own; a failed call is reported
/// once and the grid decides what to show.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Fetch one page of the collection at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// undecodable body.
    async fn fetch_page(
        &self,
        url: &str,
        request: &CollectionRequest,
    ) -> TallyboardResult<CollectionPage>;

    /// Resolve the total row count for a content hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the count endpoint fails.
    async fn fetch_total_rows(&self, request: &CountRequest) -> TallyboardResult<u64>;

    /// Load the filter option groups served at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the options endpoint fails.
    async fn fetch_filter_options(&self, url: &str) -> TallyboardResult<Vec<FilterOptionGroup>>;
}
