//! Server rows and the expanded-row set.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Stable row identifier (`_id` on the wire).
///
/// Numeric identifiers are accepted and kept in their decimal form.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct RowId(String);

impl RowId {
    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct RowRepr {
    #[serde(rename = "_id")]
    id: RowId,
    #[serde(
        rename = "isExpandRow",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    is_expand_row: bool,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// A server-provided record.
///
/// Field data sits behind an `Arc`, so cloning a row (including synthesizing
/// its expansion sibling) is a shallow copy. The expansion flag is local
/// only: it is never read back from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RowRepr", into = "RowRepr")]
pub struct Row {
    id: RowId,
    fields: Arc<Map<String, Value>>,
    is_expand_row: bool,
}

impl Row {
    /// Build a row from an identifier and its fields.
    pub fn new(id: impl Into<RowId>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields: Arc::new(fields),
            is_expand_row: false,
        }
    }

    /// Row identifier.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// All non-identifier fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a field by dotted path, e.g. `owner.nickname`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.fields.get(first)?, |value, segment| value.get(segment))
    }

    /// Whether this is a synthetic expansion row.
    pub fn is_expand_row(&self) -> bool {
        self.is_expand_row
    }

    /// Shallow copy tagged as the expansion sibling of this row.
    pub fn expansion(&self) -> Self {
        Self {
            id: self.id.clone(),
            fields: Arc::clone(&self.fields),
            is_expand_row: true,
        }
    }
}

impl From<RowRepr> for Row {
    fn from(repr: RowRepr) -> Self {
        Self::new(repr.id, repr.fields)
    }
}

impl From<Row> for RowRepr {
    fn from(row: Row) -> Self {
        Self {
            id: row.id,
            is_expand_row: row.is_expand_row,
            fields: Arc::unwrap_or_clone(row.fields),
        }
    }
}

/// Ordered set of expanded row identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows(Vec<RowId>);

impl ExpandedRows {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `id` if collapsed, collapse it if expanded.
    ///
    /// Returns whether the row is expanded afterwards.
    pub fn toggle(&mut self, id: &RowId) -> bool {
        match self.0.iter().position(|expanded| expanded == id) {
            Some(index) => {
                self.0.remove(index);
                false
            }
            None => {
                self.0.push(id.clone());
                true
            }
        }
    }

    /// Whether `id` is expanded.
    pub fn contains(&self, id: &RowId) -> bool {
        self.0.contains(id)
    }

    /// Collapse everything.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Expanded identifiers in expansion order.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.0.iter()
    }

    /// Number of expanded rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<RowId> for ExpandedRows {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            if !set.contains(&id) {
                set.0.push(id);
            }
        }
        set
    }
}
