//! Canonical grid query state and its defaults.

use crate::{ExternalParams, ParamValue};
use serde::{Deserialize, Serialize};

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query-string key for the sort field.
pub const SORT_KEY: &str = "sort";
/// Query-string key for the sort direction.
pub const ORDER_KEY: &str = "order";
/// Query-string key for the page size.
pub const SIZE_KEY: &str = "size";
/// Query-string key for the page number.
pub const PAGE_KEY: &str = "page";
/// Query-string key for the filter expression.
pub const FILTER_KEY: &str = "filter";

/// Keys owned by [`QueryState`] itself; anything else is an external parameter.
pub const RESERVED_KEYS: [&str; 5] = [SORT_KEY, ORDER_KEY, SIZE_KEY, PAGE_KEY, FILTER_KEY];

/// Sort direction, encoded on the wire as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum SortOrder {
    /// Smallest first (`1`)
    Ascending,
    /// Largest first (`-1`); the direction a newly chosen sort starts with
    #[default]
    Descending,
}

impl SortOrder {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Wire value.
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }

    /// Interpret a loosely typed parameter; only exactly `1` and `-1` qualify.
    pub fn from_param(value: &ParamValue) -> Option<Self> {
        match value.as_integer()? {
            1 => Some(Self::Ascending),
            -1 => Some(Self::Descending),
            _ => None,
        }
    }
}

impl From<SortOrder> for i8 {
    fn from(order: SortOrder) -> Self {
        order.as_i8()
    }
}

impl TryFrom<i8> for SortOrder {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascending),
            -1 => Ok(Self::Descending),
            other => Err(format!("sort order must be 1 or -1, got {}", other)),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// The canonical query state of one grid instance.
///
/// Fields are private so that the page/size lower bounds hold; use the
/// getters and the `with_*` setters, or go through a
/// [`QueryStore`](crate::QueryStore) which also enforces the pagination
/// reset rules.
///
/// # Examples
///
/// ```
/// use tallyboard_core::{QueryDefaults, SortOrder};
///
/// let defaults = QueryDefaults::new("critValue");
/// let state = defaults.state().with_page(3);
///
/// assert_eq!(state.sort(), "critValue");
/// assert_eq!(*state.order(), SortOrder::Descending);
/// assert_eq!(*state.page(), 3);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct QueryState {
    /// Sort field, possibly a dotted path such as `stats.critRate`
    #[setters(into)]
    sort: String,
    /// Sort direction
    order: SortOrder,
    /// Rows per page
    size: u32,
    /// One-based page number
    page: u32,
    /// Serialized filter expression
    #[setters(into)]
    filter: String,
    /// Extra parameters projected through the URL
    #[serde(default)]
    external: ExternalParams,
}

impl QueryState {
    /// Clamp page and size to their lower bound of 1.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.size = self.size.max(1);
        self
    }

    /// Whether any field other than the page number differs.
    ///
    /// Used to decide when a change must send the user back to page 1.
    pub fn differs_beyond_page(&self, other: &QueryState) -> bool {
        self.sort != other.sort
            || self.order != other.order
            || self.size != other.size
            || self.filter != other.filter
            || self.external != other.external
    }

    /// Set or clear one external parameter; an empty value removes it.
    pub fn with_external_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        let key = key.into();
        if value.is_empty() {
            self.external.remove(&key);
        } else {
            self.external.insert(key, value);
        }
        self
    }

    /// All fields as `(key, value)` pairs in canonical order.
    pub fn params(&self) -> Vec<(String, ParamValue)> {
        let mut params = vec![
            (SORT_KEY.to_string(), ParamValue::Text(self.sort.clone())),
            (ORDER_KEY.to_string(), ParamValue::from(i64::from(self.order.as_i8()))),
            (SIZE_KEY.to_string(), ParamValue::from(i64::from(self.size))),
            (PAGE_KEY.to_string(), ParamValue::from(i64::from(self.page))),
            (FILTER_KEY.to_string(), ParamValue::Text(self.filter.clone())),
        ];
        params.extend(
            self.external
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        params
    }
}

/// Default query state of a grid, with one explicit predicate per field.
///
/// Only the sort field varies between grids; every other default is fixed.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct QueryDefaults {
    sort: String,
}

impl QueryDefaults {
    /// Defaults for a grid sorted by `sort` (empty for unsorted).
    pub fn new(sort: impl Into<String>) -> Self {
        Self { sort: sort.into() }
    }

    /// A fresh state holding nothing but defaults.
    pub fn state(&self) -> QueryState {
        QueryState {
            sort: self.sort.clone(),
            order: SortOrder::Descending,
            size: DEFAULT_PAGE_SIZE,
            page: 1,
            filter: String::new(),
            external: ExternalParams::new(),
        }
    }

    /// Whether `sort` is the default sort field.
    pub fn is_default_sort(&self, sort: &str) -> bool {
        self.sort == sort
    }

    /// Whether `order` is the default direction.
    pub fn is_default_order(&self, order: SortOrder) -> bool {
        order == SortOrder::Descending
    }

    /// Whether `size` is the default page size.
    pub fn is_default_size(&self, size: u32) -> bool {
        size == DEFAULT_PAGE_SIZE
    }

    /// Whether `page` is the first page.
    pub fn is_default_page(&self, page: u32) -> bool {
        page == 1
    }

    /// Whether `filter` is the empty expression.
    pub fn is_default_filter(&self, filter: &str) -> bool {
        filter.is_empty()
    }

    /// External parameters default to absent, which an empty value equals.
    pub fn is_default_external(&self, value: &ParamValue) -> bool {
        value.is_empty()
    }

    /// The fields of `state` that differ from these defaults, in canonical order.
    pub fn non_default_params(&self, state: &QueryState) -> Vec<(String, ParamValue)> {
        let mut params = Vec::new();
        if !self.is_default_sort(state.sort()) {
            params.push((SORT_KEY.to_string(), ParamValue::Text(state.sort().clone())));
        }
        if !self.is_default_order(*state.order()) {
            params.push((
                ORDER_KEY.to_string(),
                ParamValue::from(i64::from(state.order().as_i8())),
            ));
        }
        if !self.is_default_size(*state.size()) {
            params.push((SIZE_KEY.to_string(), ParamValue::from(i64::from(*state.size()))));
        }
        if !self.is_default_page(*state.page()) {
            params.push((PAGE_KEY.to_string(), ParamValue::from(i64::from(*state.page()))));
        }
        if !self.is_default_filter(state.filter()) {
            params.push((FILTER_KEY.to_string(), ParamValue::Text(state.filter().clone())));
        }
        for (key, value) in state.external() {
            if !self.is_default_external(value) {
                params.push((key.clone(), value.clone()));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_no_non_default_params() {
        let defaults = QueryDefaults::new("critValue");
        assert!(defaults.non_default_params(&defaults.state()).is_empty());
    }

    #[test]
    fn test_non_default_params_canonical_order() {
        let defaults = QueryDefaults::new("critValue");
        let state = defaults
            .state()
            .with_filter("[a]1")
            .with_order(SortOrder::Ascending)
            .with_external_param("variant", ParamValue::from("profile"));

        let keys: Vec<String> = defaults
            .non_default_params(&state)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["order", "filter", "variant"]);
    }

    #[test]
    fn test_sort_order_wire_values() {
        assert_eq!(SortOrder::Descending.flipped(), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param(&ParamValue::Number(1.0)), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::from_param(&ParamValue::Number(7.0)), None);
        assert_eq!(SortOrder::from_param(&ParamValue::from("up")), None);
        assert_eq!(serde_json::to_string(&SortOrder::Descending).unwrap(), "-1");
    }

    #[test]
    fn test_empty_external_value_removes_key() {
        let state = QueryDefaults::new("")
            .state()
            .with_external_param("uids", ParamValue::from("1,2"))
            .with_external_param("uids", ParamValue::from(""));
        assert!(state.external().is_empty());
    }
}
