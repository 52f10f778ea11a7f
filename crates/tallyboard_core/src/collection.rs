//! Remote collections and their wire shapes.

use crate::Row;
use serde::{Deserialize, Serialize};

/// Collection name the count endpoint understands.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CollectionKind {
    /// Player accounts
    Accounts,
    /// Artifacts
    Artifacts,
    /// Character builds and leaderboard entries
    Characters,
}

/// Absolute URLs of the remote endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new, derive_getters::Getters)]
pub struct Endpoints {
    /// Accounts collection (prefix match, it takes sub-paths)
    #[new(into)]
    accounts: String,
    /// Artifacts collection
    #[new(into)]
    artifacts: String,
    /// Leaderboard collection
    #[new(into)]
    leaderboards: String,
    /// Builds collection
    #[new(into)]
    builds: String,
    /// Total-row-count endpoint
    #[new(into)]
    collection_size: String,
}

impl Endpoints {
    /// Collection name for a fetch URL, if the URL is one of ours.
    ///
    /// # Examples
    ///
    /// ```
    /// use tallyboard_core::{CollectionKind, Endpoints};
    ///
    /// let endpoints = Endpoints::new(
    ///     "https://api.example/accounts",
    ///     "https://api.example/artifacts",
    ///     "https://api.example/leaderboards",
    ///     "https://api.example/builds",
    ///     "https://api.example/getCollectionSize",
    /// );
    /// assert_eq!(
    ///     endpoints.collection_for("https://api.example/accounts/123"),
    ///     Some(CollectionKind::Accounts)
    /// );
    /// assert_eq!(endpoints.collection_for("https://api.example/builds"), Some(CollectionKind::Characters));
    /// assert_eq!(endpoints.collection_for("https://elsewhere.example"), None);
    /// ```
    pub fn collection_for(&self, fetch_url: &str) -> Option<CollectionKind> {
        if !self.accounts.is_empty() && fetch_url.starts_with(self.accounts.as_str()) {
            Some(CollectionKind::Accounts)
        } else if fetch_url == self.artifacts {
            Some(CollectionKind::Artifacts)
        } else if fetch_url == self.leaderboards || fetch_url == self.builds {
            Some(CollectionKind::Characters)
        } else {
            None
        }
    }
}

/// One page of a collection as returned by a collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage {
    /// Rows on this page
    #[serde(default)]
    pub data: Vec<Row>,
    /// Identity of the filtered collection, used to look up its size
    #[serde(default)]
    pub total_rows_hash: Option<String>,
}

impl CollectionPage {
    /// A page with no rows and no hash.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_rows_hash: None,
        }
    }
}

/// Query sent to the count endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct CountRequest {
    /// Collection name, omitted for unmapped fetch URLs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<CollectionKind>,
    /// Content hash from the collection page
    #[new(into)]
    pub hash: String,
}

/// Count endpoint response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRowsResponse {
    /// Rows matching the hashed query
    pub total_rows: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_decodes_hash() {
        let page: CollectionPage = serde_json::from_value(json!({
            "data": [{"_id": "a"}, {"_id": "b"}],
            "totalRowsHash": "f00d"
        }))
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total_rows_hash.as_deref(), Some("f00d"));
    }

    #[test]
    fn test_count_request_omits_unknown_variant() {
        let request = CountRequest::new(None, "f00d");
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"hash": "f00d"}));

        let request = CountRequest::new(Some(CollectionKind::Characters), "f00d");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"variant": "characters", "hash": "f00d"})
        );
    }

    #[test]
    fn test_kind_parses_from_lowercase() {
        assert_eq!("artifacts".parse::<CollectionKind>().unwrap(), CollectionKind::Artifacts);
        assert_eq!(CollectionKind::Accounts.to_string(), "accounts");
    }
}
