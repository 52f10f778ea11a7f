//! Column metadata consumed by the grid renderer.

use crate::QueryUpdate;
use serde::{Deserialize, Serialize};

/// Static description of one grid column.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into), default)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSpec {
    /// Header text
    name: String,
    /// Whether clicking the header sorts by `sort_field`
    sortable: bool,
    /// Field the header sorts by
    #[builder(setter(into, strip_option))]
    sort_field: Option<String>,
    /// Alternative sort fields offered by a picker inside the header
    sort_fields: Vec<String>,
    /// Column span while this column holds the active sort (`0` hides it)
    #[builder(setter(into, strip_option))]
    col_span: Option<u32>,
    /// CSS width
    #[builder(setter(into, strip_option))]
    width: Option<String>,
}

impl ColumnSpec {
    /// Returns a builder for a column.
    pub fn builder() -> ColumnSpecBuilder {
        ColumnSpecBuilder::default()
    }

    /// The update a header click produces, if the column is sortable.
    pub fn header_click(&self) -> Option<QueryUpdate> {
        if !self.sortable {
            return None;
        }
        self.sort_field
            .as_ref()
            .map(|field| QueryUpdate::SortBy(field.clone()))
    }

    /// Whether the column holds the active sort field.
    pub fn is_highlighted(&self, sort: &str) -> bool {
        !sort.is_empty()
            && (self.sort_field.as_deref() == Some(sort)
                || self.sort_fields.iter().any(|field| field == sort))
    }

    /// Header label: the picked alternative sort field, else the column name.
    pub fn header_label(&self, sort: &str) -> String {
        if self.sort_fields.iter().any(|field| field == sort) {
            if let Some(label) = sort_display_label(sort) {
                return label;
            }
        }
        self.name.clone()
    }

    /// Effective column span given the active sort.
    pub fn effective_col_span(&self, sort: &str) -> u32 {
        if self.is_highlighted(sort) {
            self.col_span.unwrap_or(0)
        } else {
            1
        }
    }

    /// Whether the column collapses away while highlighted.
    pub fn is_hidden(&self, sort: &str) -> bool {
        self.is_highlighted(sort) && self.col_span == Some(0)
    }
}

/// Display label for a possibly dotted sort path.
///
/// Uses the last path segment, with the crit-stat keys spelled out.
///
/// # Examples
///
/// ```
/// use tallyboard_core::sort_display_label;
///
/// assert_eq!(sort_display_label("stats.critDMG").as_deref(), Some("Crit DMG"));
/// assert_eq!(sort_display_label("substats.Elemental Mastery").as_deref(), Some("Elemental Mastery"));
/// assert_eq!(sort_display_label("stats."), None);
/// ```
pub fn sort_display_label(path: &str) -> Option<String> {
    let key = path.rsplit('.').next().filter(|key| !key.is_empty())?;
    let label = match key {
        "critValue" => "Crit Value",
        "critRate" => "Crit Rate",
        "critDamage" | "critDMG" => "Crit DMG",
        other => other,
    };
    Some(label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crit_column() -> ColumnSpec {
        ColumnSpec::builder()
            .name("Crit Ratio")
            .sortable(true)
            .sort_field("critValue")
            .sort_fields(vec!["stats.critRate".to_string(), "stats.critDMG".to_string()])
            .col_span(2u32)
            .build()
            .expect("valid column")
    }

    #[test]
    fn test_unsortable_header_is_inert() {
        let column = ColumnSpec::builder()
            .name("Owner")
            .sort_field("owner.nickname")
            .build()
            .expect("valid column");
        assert_eq!(column.header_click(), None);
    }

    #[test]
    fn test_header_click_sorts_by_field() {
        assert_eq!(
            crit_column().header_click(),
            Some(QueryUpdate::SortBy("critValue".into()))
        );
    }

    #[test]
    fn test_highlight_and_label() {
        let column = crit_column();
        assert!(column.is_highlighted("stats.critDMG"));
        assert!(!column.is_highlighted(""));
        assert_eq!(column.header_label("stats.critDMG"), "Crit DMG");
        assert_eq!(column.header_label("critValue"), "Crit Ratio");
        assert_eq!(column.effective_col_span("critValue"), 2);
        assert_eq!(column.effective_col_span("other"), 1);
        assert!(!column.is_hidden("critValue"));
    }
}
