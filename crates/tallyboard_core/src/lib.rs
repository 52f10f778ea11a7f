//! Core data types for the Tallyboard grid client.
//!
//! Everything here is synchronous and free of I/O: the query state and its
//! store, the query-string codec, filter pills, rows and the expansion
//! reconciler, plus the wire shapes of the collection endpoints.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod collection;
mod column;
mod filter;
mod filter_options;
mod pagination;
mod param;
mod query_state;
mod reconcile;
mod request;
mod row;
mod store;
mod url_codec;

pub use collection::{CollectionKind, CollectionPage, CountRequest, Endpoints, TotalRowsResponse};
pub use column::{ColumnSpec, ColumnSpecBuilder, ColumnSpecBuilderError, sort_display_label};
pub use filter::{FilterPill, compile_filter, parse_filter};
pub use filter_options::{
    FilterOption, FilterOptionGroup, SelectableOption, pills_from_selection, selected_options,
};
pub use pagination::PageView;
pub use param::{ExternalParams, ParamValue};
pub use query_state::{
    DEFAULT_PAGE_SIZE, FILTER_KEY, ORDER_KEY, PAGE_KEY, QueryDefaults, QueryState, RESERVED_KEYS,
    SIZE_KEY, SORT_KEY, SortOrder,
};
pub use reconcile::reconcile;
pub use request::{CollectionRequest, IDENTIFIER_KEYS};
pub use row::{ExpandedRows, Row, RowId};
pub use store::{QueryStore, QueryUpdate};
pub use url_codec::{decode_query, encode_query};
