//! Filter option groups served by the filter-options endpoint.

use crate::FilterPill;
use serde::{Deserialize, Serialize};

/// A selectable value inside an option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct FilterOption {
    /// Display name
    #[serde(default)]
    name: String,
    /// Value sent to the server
    value: String,
    /// Optional icon URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
}

/// A group of options sharing a field key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionGroup {
    /// Human-readable group title
    field_name: String,
    /// Field key that becomes the pill name
    field_key: String,
    /// Available values
    #[serde(default)]
    options: Vec<FilterOption>,
}

/// A flattened option as shown in the multi-select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct SelectableOption {
    /// Label including any set-piece prefix
    label: String,
    /// Option value
    value: String,
    /// Field key of the owning group
    field_key: String,
    /// Optional icon URL
    icon: Option<String>,
}

impl SelectableOption {
    /// The pill this option stands for.
    pub fn to_pill(&self) -> FilterPill {
        FilterPill::new(self.field_key.as_str(), self.value.as_str())
    }

    /// Case-insensitive match against text typed into the control.
    pub fn matches(&self, input: &str) -> bool {
        input.is_empty() || self.label.to_lowercase().contains(&input.to_lowercase())
    }
}

/// Label prefix for artifact set-piece groups.
fn label_prefix(field_key: &str) -> &'static str {
    match field_key {
        "artifactSets.$1" => "1p ",
        "artifactSets.$2" => "2p ",
        "artifactSets.$4" => "4p ",
        _ => "",
    }
}

impl FilterOptionGroup {
    /// Flatten this group's options into selectable entries.
    pub fn selectable_options(&self) -> Vec<SelectableOption> {
        let prefix = label_prefix(&self.field_key);
        self.options
            .iter()
            .map(|option| SelectableOption {
                label: format!("{}{}", prefix, option.name),
                value: option.value.clone(),
                field_key: self.field_key.clone(),
                icon: option.icon.clone(),
            })
            .collect()
    }
}

/// Resolve the active pills to the options they select, in pill order.
///
/// Pills that match no option (stale URL state, option removed server-side)
/// are left out.
pub fn selected_options(groups: &[FilterOptionGroup], pills: &[FilterPill]) -> Vec<SelectableOption> {
    let all: Vec<SelectableOption> = groups
        .iter()
        .flat_map(FilterOptionGroup::selectable_options)
        .collect();

    pills
        .iter()
        .filter_map(|pill| {
            all.iter()
                .find(|option| option.field_key == *pill.name() && option.value == *pill.value())
                .cloned()
        })
        .collect()
}

/// Convert a multi-select result back into pills.
pub fn pills_from_selection(selection: &[SelectableOption]) -> Vec<FilterPill> {
    selection.iter().map(SelectableOption::to_pill).collect()
}
