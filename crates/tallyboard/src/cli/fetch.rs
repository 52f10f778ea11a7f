//! Fetch command handler.

use super::FetchArgs;
use super::commands::OrderArg;
use serde_json::{Value, json};
use std::sync::Arc;
use tallyboard::{Grid, GridOptions, MemoryAddressBar};
use tallyboard_client::{ClientConfig, FetchPhase, HttpCollectionSource};
use tallyboard_core::{
    ExternalParams, FilterPill, ParamValue, QueryDefaults, SortOrder, compile_filter, decode_query,
    encode_query,
};
use tallyboard_error::{QueryError, QueryErrorKind, TallyboardResult};
use tracing::{debug, info};

/// Resolve an endpoint name or path to an absolute URL.
///
/// The collection names from the config (`accounts`, `artifacts`,
/// `leaderboards`, `builds`) are recognized; anything else is resolved
/// against the base URL.
pub(crate) fn resolve_endpoint(config: &ClientConfig, endpoint: &str) -> TallyboardResult<String> {
    let endpoints = config.endpoints();
    let url = match endpoint {
        "accounts" => endpoints.accounts().clone(),
        "artifacts" => endpoints.artifacts().clone(),
        "leaderboards" => endpoints.leaderboards().clone(),
        "builds" => endpoints.builds().clone(),
        other => config.resolve(other),
    };
    url::Url::parse(&url)
        .map_err(|e| QueryError::new(QueryErrorKind::InvalidUrl(format!("{}: {}", url, e))))?;
    Ok(url)
}

/// Split a `key=value` argument.
pub(crate) fn split_pair(flag: &str, raw: &str) -> TallyboardResult<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(QueryError::new(QueryErrorKind::InvalidParameter {
            key: flag.to_string(),
            value: raw.to_string(),
        })
        .into()),
    }
}

/// Build the query string the grid is mounted with.
///
/// Flags override what `--query` says; the result only holds non-default
/// fields, exactly as a bookmarked URL would.
pub(crate) fn initial_search(args: &FetchArgs) -> TallyboardResult<String> {
    let defaults = QueryDefaults::new("");
    let mut state = decode_query(
        args.query.as_deref().unwrap_or_default(),
        &defaults.state(),
        &defaults,
    );

    if let Some(sort) = &args.sort {
        state = state.with_sort(sort.as_str());
    }
    if let Some(order) = args.order {
        state = state.with_order(match order {
            OrderArg::Asc => SortOrder::Ascending,
            OrderArg::Desc => SortOrder::Descending,
        });
    }
    if !args.filters.is_empty() {
        let pills = args
            .filters
            .iter()
            .map(|raw| split_pair("filter", raw).map(|(name, value)| FilterPill::new(name, value)))
            .collect::<TallyboardResult<Vec<_>>>()?;
        state = state.with_filter(compile_filter(&pills));
    }
    if let Some(size) = args.size {
        state = state.with_size(size);
    }
    if let Some(page) = args.page {
        state = state.with_page(page);
    }

    Ok(encode_query(&state.normalized(), &defaults))
}

/// Handles the fetch command: mounts a grid, waits for its page and count.
#[tracing::instrument(skip_all, fields(endpoint = %args.endpoint))]
pub async fn handle_fetch_command(config: &ClientConfig, args: FetchArgs) -> TallyboardResult<Value> {
    let fetch_url = resolve_endpoint(config, &args.endpoint)?;
    let collection = config.endpoints().collection_for(&fetch_url);

    let mut fetch_params = ExternalParams::new();
    for raw in &args.params {
        let (key, value) = split_pair("param", raw)?;
        fetch_params.insert(key, ParamValue::coerce(&value));
    }

    let search = initial_search(&args)?;
    debug!(search = %search, "Initial query string");

    let options = GridOptions::default()
        .with_fetch_url(fetch_url.as_str())
        .with_collection(collection)
        .with_project_params_to_path(true)
        .with_ignore_empty_uids(args.ignore_empty_uids)
        .with_fetch_params(fetch_params);

    let source = Arc::new(HttpCollectionSource::new(config)?);
    let grid = Grid::mount(
        options,
        Vec::new(),
        source,
        Some(Box::new(MemoryAddressBar::new(search))),
    );
    grid.settle().await;

    let view = grid.view();
    if *view.phase() == FetchPhase::Failed {
        if let Some(err) = view.error().clone() {
            return Err(err);
        }
    }

    let data = grid.data();
    info!(
        rows = view.rows().len(),
        total_rows = data.total_rows(),
        "Fetched page"
    );

    Ok(json!({
        "url": fetch_url,
        "query": view.query(),
        "totalRows": data.total_rows(),
        "pagination": view.pagination(),
        "rows": view.rows(),
    }))
}
