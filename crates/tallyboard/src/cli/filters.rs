//! Filters command handler.

use super::fetch::resolve_endpoint;
use serde_json::{Value, json};
use tallyboard_client::{ClientConfig, HttpCollectionSource};
use tallyboard_core::{parse_filter, selected_options};
use tallyboard_error::TallyboardResult;
use tallyboard_interface::CollectionSource;

/// Handles the filters command.
///
/// Prints the option groups and, given a filter expression, the options it
/// selects.
#[tracing::instrument(skip(config))]
pub async fn handle_filters_command(
    config: &ClientConfig,
    url: &str,
    filter: Option<&str>,
) -> TallyboardResult<Value> {
    let url = resolve_endpoint(config, url)?;
    let source = HttpCollectionSource::new(config)?;
    let groups = source.fetch_filter_options(&url).await?;

    let pills = parse_filter(filter.unwrap_or_default());
    let selected = selected_options(&groups, &pills);
    tracing::info!(groups = groups.len(), selected = selected.len(), "Loaded filter options");

    Ok(json!({
        "groups": groups,
        "selected": selected,
    }))
}
