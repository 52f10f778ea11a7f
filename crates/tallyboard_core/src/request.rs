//! The merged parameter set sent to a collection endpoint.

use crate::{ExternalParams, ParamValue, QueryState};
use serde::Serialize;
use std::collections::BTreeMap;

/// Parameter keys that scope a grid to a caller-supplied identifier list.
pub const IDENTIFIER_KEYS: [&str; 2] = ["uids", "uid"];

/// Query state merged with the grid's fixed fetch parameters.
///
/// Keys are kept sorted, so two requests built from equal inputs compare
/// equal regardless of the order parameters were supplied in. Fixed fetch
/// parameters win over state fields of the same name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CollectionRequest {
    params: BTreeMap<String, ParamValue>,
}

impl CollectionRequest {
    /// Merge `state` with the fixed `fetch_params`.
    pub fn new(state: &QueryState, fetch_params: &ExternalParams) -> Self {
        let mut params: BTreeMap<String, ParamValue> = state.params().into_iter().collect();
        params.extend(
            fetch_params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Self { params }
    }

    /// Look up one parameter.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// All parameters, sorted by key.
    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    /// Parameters rendered as query-string pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }

    /// Whether every identifier parameter is absent or empty.
    pub fn lacks_identifiers(&self) -> bool {
        IDENTIFIER_KEYS
            .iter()
            .all(|key| self.params.get(*key).is_none_or(ParamValue::is_empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryDefaults;

    fn state() -> QueryState {
        QueryDefaults::new("critValue").state().with_page(2)
    }

    #[test]
    fn test_fetch_params_override_state() {
        let mut fixed = ExternalParams::new();
        fixed.insert("size".into(), ParamValue::from(50i64));
        fixed.insert("variant".into(), ParamValue::from("top"));
        let request = CollectionRequest::new(&state(), &fixed);

        assert_eq!(request.get("size"), Some(&ParamValue::from(50i64)));
        assert_eq!(request.get("page"), Some(&ParamValue::from(2i64)));
        let pairs = request.to_query_pairs();
        assert!(pairs.contains(&("order".to_string(), "-1".to_string())));
        assert!(pairs.contains(&("variant".to_string(), "top".to_string())));
    }

    #[test]
    fn test_empty_identifier_lists() {
        let mut fixed = ExternalParams::new();
        fixed.insert("uids".into(), ParamValue::from(""));
        fixed.insert("uid".into(), ParamValue::from(""));
        assert!(CollectionRequest::new(&state(), &fixed).lacks_identifiers());
        assert!(CollectionRequest::new(&state(), &ExternalParams::new()).lacks_identifiers());

        fixed.insert("uids".into(), ParamValue::from("701464050,600000001"));
        assert!(!CollectionRequest::new(&state(), &fixed).lacks_identifiers());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let mut first = ExternalParams::new();
        first.insert("b".into(), ParamValue::from("2"));
        first.insert("a".into(), ParamValue::from("1"));
        let mut second = ExternalParams::new();
        second.insert("a".into(), ParamValue::from("1"));
        second.insert("b".into(), ParamValue::from("2"));
        assert_eq!(
            CollectionRequest::new(&state(), &first),
            CollectionRequest::new(&state(), &second)
        );
    }
}
