//! Per-grid configuration.

use derive_getters::Getters;
use derive_setters::Setters;
use tallyboard_core::{CollectionKind, ExternalParams, ParamValue};

/// How one grid instance is wired to its collection and the page.
///
/// # Examples
///
/// ```
/// use tallyboard::{GridOptions, ParamValue};
///
/// let options = GridOptions::default()
///     .with_fetch_url("https://api.example/api/leaderboards")
///     .with_default_sort("result")
///     .with_fetch_param("calculationId", ParamValue::from(1000000i64))
///     .with_project_params_to_path(true);
/// assert_eq!(options.default_sort(), "result");
/// assert_eq!(options.fetch_params().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct GridOptions {
    /// Collection endpoint; no fetching happens without one
    #[setters(into, strip_option)]
    fetch_url: Option<String>,
    /// Collection name sent to the count endpoint
    collection: Option<CollectionKind>,
    /// Filter-options endpoint feeding the pill selector
    #[setters(into, strip_option)]
    filters_url: Option<String>,
    /// Sort field of the default query state
    #[setters(into)]
    default_sort: String,
    /// Whether clicking a row expands it
    expandable_rows: bool,
    /// Whether the pagination controls are omitted
    hide_pagination: bool,
    /// Whether the query state is mirrored into the address bar
    project_params_to_path: bool,
    /// Resolve to no rows instead of fetching when `uids`/`uid` are empty
    ignore_empty_uids: bool,
    /// Fixed parameters sent with every request
    fetch_params: ExternalParams,
}

impl GridOptions {
    /// Add one fixed fetch parameter.
    pub fn with_fetch_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.fetch_params.insert(key.into(), value);
        self
    }

    pub(crate) fn replace_fetch_params(&mut self, params: ExternalParams) -> bool {
        if self.fetch_params == params {
            return false;
        }
        self.fetch_params = params;
        true
    }
}
