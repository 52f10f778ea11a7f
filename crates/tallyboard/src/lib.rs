//! Query-state engine for paginated, sortable, filterable leaderboard grids.
//!
//! A [`Grid`] ties together the pieces of the workspace: the query state
//! store, the address-bar synchronizer, the filter pills, the fetch
//! controller and the row reconciler. It is driven by explicit
//! [`GridEvent`]s and rendered from a [`GridView`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use tallyboard::{ClientConfig, Grid, GridEvent, GridOptions, HttpCollectionSource};
//!
//! # async fn demo() -> tallyboard::TallyboardResult<()> {
//! let config = ClientConfig::load(None)?;
//! let source = Arc::new(HttpCollectionSource::new(&config)?);
//! let endpoints = config.endpoints();
//! let options = GridOptions::default()
//!     .with_fetch_url(endpoints.builds().clone())
//!     .with_collection(endpoints.collection_for(endpoints.builds()))
//!     .with_default_sort("critValue");
//!
//! let mut grid = Grid::mount(options, Vec::new(), source, None);
//! grid.handle(GridEvent::PageChanged(2));
//! grid.settle().await;
//! println!("{} rows", grid.view().rows().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod address;
mod grid;
mod options;

pub use address::MemoryAddressBar;
pub use grid::{Grid, GridEvent, GridView, HeaderView};
pub use options::GridOptions;

pub use tallyboard_client::{
    ClientConfig, FetchController, FetchOutcome, FetchPhase, GridData, HttpCollectionSource,
};
pub use tallyboard_core::{
    CollectionKind, ColumnSpec, Endpoints, ExpandedRows, ExternalParams, FilterOptionGroup,
    FilterPill, PageView, ParamValue, QueryDefaults, QueryState, QueryStore, QueryUpdate, Row,
    RowId, SelectableOption, SortOrder, compile_filter, decode_query, encode_query, parse_filter,
};
pub use tallyboard_error::{
    QueryError, QueryErrorKind, TallyboardError, TallyboardErrorKind, TallyboardResult,
};
pub use tallyboard_interface::{AddressBar, CollectionSource};
