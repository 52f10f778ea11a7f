//! Mapping between query state and the address bar's query string.

use crate::{
    FILTER_KEY, ORDER_KEY, PAGE_KEY, ParamValue, QueryDefaults, QueryState, SIZE_KEY, SORT_KEY,
    SortOrder,
};
use tracing::{debug, instrument, warn};
use url::form_urlencoded;

/// Serialize the non-default fields of `state` as a query string.
///
/// Fields equal to their default are never written, so a grid in its default
/// state produces an empty string. No leading `?` is included.
///
/// # Examples
///
/// ```
/// use tallyboard_core::{QueryDefaults, encode_query};
///
/// let defaults = QueryDefaults::new("critValue");
/// assert_eq!(encode_query(&defaults.state(), &defaults), "");
///
/// let state = defaults.state().with_page(2).with_size(50);
/// assert_eq!(encode_query(&state, &defaults), "size=50&page=2");
/// ```
pub fn encode_query(state: &QueryState, defaults: &QueryDefaults) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in defaults.non_default_params(state) {
        serializer.append_pair(&key, &value.to_string());
    }
    serializer.finish()
}

/// Merge a query string into `current`, returning the hydrated state.
///
/// Only keys whose parsed value differs from the default are merged, so a
/// URL spelling out a default never overrides anything. Values that cannot
/// be interpreted for their field (for example `order=7` or `page=0`) are
/// dropped with a warning. A leading `?` is accepted.
#[instrument(skip(current, defaults), level = "debug")]
pub fn decode_query(search: &str, current: &QueryState, defaults: &QueryDefaults) -> QueryState {
    let search = search.strip_prefix('?').unwrap_or(search);
    let mut state = current.clone();

    for (key, raw) in form_urlencoded::parse(search.as_bytes()) {
        let key = key.as_ref();
        let raw = raw.as_ref();
        match key {
            SORT_KEY => {
                if !defaults.is_default_sort(raw) {
                    state = state.with_sort(raw);
                }
            }
            FILTER_KEY => {
                if !defaults.is_default_filter(raw) {
                    state = state.with_filter(raw);
                }
            }
            ORDER_KEY => match SortOrder::from_param(&ParamValue::coerce(raw)) {
                Some(order) if !defaults.is_default_order(order) => {
                    state = state.with_order(order);
                }
                Some(_) => {}
                None => warn!(key, value = raw, "Ignoring invalid sort order in URL"),
            },
            SIZE_KEY => match positive_integer(raw) {
                Some(size) if !defaults.is_default_size(size) => state = state.with_size(size),
                Some(_) => {}
                None => warn!(key, value = raw, "Ignoring invalid page size in URL"),
            },
            PAGE_KEY => match positive_integer(raw) {
                Some(page) if !defaults.is_default_page(page) => state = state.with_page(page),
                Some(_) => {}
                None => warn!(key, value = raw, "Ignoring invalid page number in URL"),
            },
            _ => {
                let value = ParamValue::coerce(raw);
                if !defaults.is_default_external(&value) {
                    state = state.with_external_param(key, value);
                }
            }
        }
    }

    debug!(?state, "Decoded query string");
    state
}

fn positive_integer(raw: &str) -> Option<u32> {
    ParamValue::coerce(raw)
        .as_integer()
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values_in_url_are_not_merged() {
        let defaults = QueryDefaults::new("critValue");
        let current = defaults.state().with_size(50);
        let decoded = decode_query("?size=20&sort=critValue", &current, &defaults);
        assert_eq!(*decoded.size(), 50);
    }

    #[test]
    fn test_invalid_typed_values_are_dropped() {
        let defaults = QueryDefaults::new("critValue");
        let decoded = decode_query("order=7&page=0&size=abc", &defaults.state(), &defaults);
        assert_eq!(decoded, defaults.state());
    }

    #[test]
    fn test_unknown_keys_become_external_params() {
        let defaults = QueryDefaults::new("");
        let decoded = decode_query("variant=profile&calculationId=1000000", &defaults.state(), &defaults);
        assert_eq!(
            decoded.external().get("variant"),
            Some(&ParamValue::from("profile"))
        );
        assert_eq!(
            decoded.external().get("calculationId"),
            Some(&ParamValue::Number(1_000_000.0))
        );
    }

    #[test]
    fn test_filter_brackets_survive_encoding() {
        let defaults = QueryDefaults::new("critValue");
        let state = defaults.state().with_filter("[stats.critRate]0.5[all]1");
        let encoded = encode_query(&state, &defaults);
        let decoded = decode_query(&encoded, &defaults.state(), &defaults);
        assert_eq!(decoded.filter(), "[stats.critRate]0.5[all]1");
    }
}
