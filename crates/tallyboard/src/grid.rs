//! One grid instance: query state, address bar, fetching and display rows.

use crate::GridOptions;
use derive_getters::Getters;
use serde::Serialize;
use std::sync::Arc;
use tallyboard_client::{FetchController, FetchPhase, GridData};
use tallyboard_core::{
    CollectionRequest, ColumnSpec, ExternalParams, FilterOptionGroup, FilterPill, PageView,
    ParamValue, QueryDefaults, QueryState, QueryStore, QueryUpdate, Row, RowId, SelectableOption,
    SortOrder, compile_filter, decode_query, encode_query, parse_filter, selected_options,
};
use tallyboard_error::{QueryError, QueryErrorKind, TallyboardError, TallyboardResult};
use tallyboard_interface::{AddressBar, CollectionSource};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// A user interaction the grid reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Header of the column at this index was clicked
    HeaderClicked(usize),
    /// A sort field was picked directly, e.g. from a column's sort picker
    SortBy(String),
    /// Pagination moved to a page
    PageChanged(u32),
    /// Rows-per-page changed
    PageSizeChanged(u32),
    /// The pill selection changed
    PillsChanged(Vec<FilterPill>),
    /// A row was clicked
    RowClicked(RowId),
    /// A projected query parameter changed; an empty value removes it
    QueryParamChanged(String, ParamValue),
    /// The hosting page replaced the fixed fetch parameters
    FetchParamsChanged(ExternalParams),
    /// Fetch again with the current parameters
    Refresh,
}

/// Rendering data for one column header.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    /// Header text
    label: String,
    /// Whether this column holds the active sort
    highlighted: bool,
    /// Sort direction indicator, shown on the highlighted column
    order: Option<SortOrder>,
    /// Column span to render with
    col_span: u32,
    /// Whether the column collapses away
    hidden: bool,
    /// CSS width
    width: Option<String>,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Getters)]
pub struct GridView {
    /// Column headers
    headers: Vec<HeaderView>,
    /// Rows with expansion rows spliced in
    rows: Vec<Row>,
    /// Pagination controls, absent when hidden
    pagination: Option<PageView>,
    /// Phase of the latest page request
    phase: FetchPhase,
    /// Whether a page request is in flight
    loading: bool,
    /// Whether the row count is still being resolved
    counting: bool,
    /// Error of the latest failed request
    error: Option<TallyboardError>,
    /// Canonical query string of the current state
    query: String,
}

/// One configured grid bound to one collection endpoint.
///
/// The grid owns its address bar, so only one grid can project onto it.
/// Dropping the grid cancels its in-flight requests.
pub struct Grid {
    options: GridOptions,
    columns: Vec<ColumnSpec>,
    store: QueryStore,
    pills: Vec<FilterPill>,
    source: Arc<dyn CollectionSource>,
    address: Option<Box<dyn AddressBar>>,
    controller: Option<FetchController>,
    last_request: Option<CollectionRequest>,
}

impl Grid {
    /// Mount a grid and start its first fetch.
    ///
    /// With `project_params_to_path`, the address bar's query string is read
    /// first and the state hydrated from it. Must be called from within a
    /// tokio runtime when a fetch URL is configured.
    #[instrument(skip_all, fields(fetch_url = ?options.fetch_url()))]
    pub fn mount(
        options: GridOptions,
        columns: Vec<ColumnSpec>,
        source: Arc<dyn CollectionSource>,
        address: Option<Box<dyn AddressBar>>,
    ) -> Self {
        let mut store = QueryStore::new(QueryDefaults::new(options.default_sort().as_str()));

        if *options.project_params_to_path() {
            if let Some(bar) = address.as_ref() {
                let hydrated = decode_query(&bar.search(), store.state(), store.defaults());
                store.replace(hydrated);
            }
        }

        let pills = parse_filter(store.state().filter());
        let controller = options.fetch_url().as_ref().map(|url| {
            FetchController::new(
                Arc::clone(&source),
                url.as_str(),
                *options.collection(),
                *options.ignore_empty_uids(),
            )
        });

        info!(
            sort = %store.state().sort(),
            page = store.state().page(),
            pills = pills.len(),
            "Mounting grid"
        );

        let mut grid = Self {
            options,
            columns,
            store,
            pills,
            source,
            address,
            controller,
            last_request: None,
        };
        grid.sync(true);
        grid
    }

    /// React to one interaction; returns whether the query state changed.
    #[instrument(skip(self), level = "debug")]
    pub fn handle(&mut self, event: GridEvent) -> bool {
        let changed = match event {
            GridEvent::HeaderClicked(index) => match self
                .columns
                .get(index)
                .and_then(ColumnSpec::header_click)
            {
                Some(update) => self.store.apply(update),
                None => false,
            },
            GridEvent::SortBy(field) => self.store.apply(QueryUpdate::SortBy(field)),
            GridEvent::PageChanged(page) => self.store.apply(QueryUpdate::Page(page)),
            GridEvent::PageSizeChanged(size) => self.store.apply(QueryUpdate::PageSize(size)),
            GridEvent::PillsChanged(pills) => self.set_pills(pills),
            GridEvent::RowClicked(id) => {
                self.toggle_row(&id);
                false
            }
            GridEvent::QueryParamChanged(key, value) => {
                self.store.apply(QueryUpdate::Param { key, value })
            }
            GridEvent::FetchParamsChanged(params) => {
                if self.options.replace_fetch_params(params) {
                    self.store.apply(QueryUpdate::Page(1));
                }
                false
            }
            GridEvent::Refresh => {
                self.sync(true);
                return false;
            }
        };

        if changed && compile_filter(&self.pills) != *self.store.state().filter() {
            self.pills = parse_filter(self.store.state().filter());
        }
        self.sync(false);
        changed
    }

    /// Fetch again with the current parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid has no fetch URL.
    pub fn refresh(&mut self) -> TallyboardResult<()> {
        if self.controller.is_none() {
            return Err(QueryError::new(QueryErrorKind::MissingFetchUrl).into());
        }
        self.sync(true);
        Ok(())
    }

    fn set_pills(&mut self, pills: Vec<FilterPill>) -> bool {
        let filter = compile_filter(&pills);
        self.pills = pills;
        if filter == *self.store.state().filter() {
            debug!("Filter expression unchanged");
            return false;
        }
        self.store.apply(QueryUpdate::Filter(filter))
    }

    fn toggle_row(&mut self, id: &RowId) {
        if !*self.options.expandable_rows() {
            return;
        }
        if let Some(controller) = self.controller.as_ref() {
            controller.toggle_expanded(id);
        }
    }

    /// Write the address bar and fetch if the merged request changed.
    fn sync(&mut self, force: bool) {
        if *self.options.project_params_to_path() {
            if let Some(bar) = self.address.as_mut() {
                let search = encode_query(self.store.state(), self.store.defaults());
                if bar.search().trim_start_matches('?') != search {
                    bar.replace_search(&search);
                }
            }
        }

        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        let request = CollectionRequest::new(self.store.state(), self.options.fetch_params());
        if !force && self.last_request.as_ref() == Some(&request) {
            return;
        }
        debug!(force, "Request changed, fetching");
        controller.trigger(request.clone());
        self.last_request = Some(request);
    }

    /// Current query state.
    pub fn state(&self) -> &QueryState {
        self.store.state()
    }

    /// Current pills, in selection order.
    pub fn pills(&self) -> &[FilterPill] {
        &self.pills
    }

    /// Options this grid was mounted with.
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// The address bar, when the grid owns one.
    pub fn address_bar(&self) -> Option<&dyn AddressBar> {
        self.address.as_deref()
    }

    /// Latest fetch-side data, empty when the grid has no fetch URL.
    pub fn data(&self) -> GridData {
        self.controller
            .as_ref()
            .map(FetchController::snapshot)
            .unwrap_or_default()
    }

    /// Observe fetch-side changes.
    pub fn subscribe(&self) -> Option<watch::Receiver<GridData>> {
        self.controller.as_ref().map(FetchController::subscribe)
    }

    /// Wait for in-flight requests and row counts to finish.
    pub async fn settle(&self) {
        if let Some(controller) = self.controller.as_ref() {
            controller.settle().await;
        }
    }

    /// Load the filter option groups, empty when no filters URL is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the options endpoint fails.
    pub async fn load_filter_options(&self) -> TallyboardResult<Vec<FilterOptionGroup>> {
        match self.options.filters_url() {
            Some(url) => self.source.fetch_filter_options(url).await,
            None => Ok(Vec::new()),
        }
    }

    /// The options the current pills select.
    pub fn selected_filter_options(&self, groups: &[FilterOptionGroup]) -> Vec<SelectableOption> {
        selected_options(groups, &self.pills)
    }

    /// Build the render data for the current state.
    pub fn view(&self) -> GridView {
        let data = self.data();
        let state = self.store.state();
        let sort = state.sort().as_str();

        let headers = self
            .columns
            .iter()
            .map(|column| {
                let highlighted = column.is_highlighted(sort);
                HeaderView {
                    label: column.header_label(sort),
                    highlighted,
                    order: highlighted.then_some(*state.order()),
                    col_span: column.effective_col_span(sort),
                    hidden: column.is_hidden(sort),
                    width: column.width().clone(),
                }
            })
            .collect();

        let rows = data.display_rows();
        let pagination = (!*self.options.hide_pagination()).then(|| {
            PageView::new(
                *state.page(),
                *state.size(),
                *data.total_rows(),
                &rows,
                *data.is_loading(),
            )
        });

        GridView {
            headers,
            rows,
            pagination,
            phase: *data.phase(),
            loading: *data.is_loading(),
            counting: data.is_counting(),
            error: data.error().clone(),
            query: encode_query(state, self.store.defaults()),
        }
    }
}
