//! Filter pills and the `[name]value` filter expression.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One atomic `(field, value)` filter selection.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_new::new,
)]
pub struct FilterPill {
    /// Field key, e.g. `stats.critRate` or `artifactSets.$4`
    #[new(into)]
    name: String,
    /// Selected value for the field
    #[new(into)]
    value: String,
}

impl FilterPill {
    /// A pill contributes to the expression only when both parts are non-empty.
    pub fn is_active(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }

    /// Whether the pill can be parsed back out of a compiled expression.
    ///
    /// The bracket syntax has no escaping: a `]` in the name or a `[` in
    /// either part shifts the boundaries seen by the server.
    pub fn is_unambiguous(&self) -> bool {
        !self.name.contains(['[', ']']) && !self.value.contains('[')
    }
}

/// Compile pills into the wire filter expression `[name]value[name2]value2…`.
///
/// Pills with an empty name or value are skipped entirely; the remaining ones
/// keep their insertion order.
///
/// # Examples
///
/// ```
/// use tallyboard_core::{FilterPill, compile_filter};
///
/// let pills = vec![
///     FilterPill::new("a", "1"),
///     FilterPill::new("", "2"),
///     FilterPill::new("b", ""),
/// ];
/// assert_eq!(compile_filter(&pills), "[a]1");
/// ```
pub fn compile_filter(pills: &[FilterPill]) -> String {
    let mut expression = String::new();
    for pill in pills.iter().filter(|pill| pill.is_active()) {
        if !pill.is_unambiguous() {
            warn!(
                name = %pill.name,
                value = %pill.value,
                "Filter pill contains bracket delimiters; server may split it differently"
            );
        }
        expression.push('[');
        expression.push_str(&pill.name);
        expression.push(']');
        expression.push_str(&pill.value);
    }
    expression
}

/// Parse a filter expression back into pills.
///
/// Text before the first `[` and an unterminated trailing `[name` are ignored.
/// Pills that would compile to nothing are not produced.
///
/// # Examples
///
/// ```
/// use tallyboard_core::{FilterPill, parse_filter};
///
/// assert_eq!(
///     parse_filter("[all]1[stats.critRate]0.5"),
///     vec![FilterPill::new("all", "1"), FilterPill::new("stats.critRate", "0.5")]
/// );
/// ```
pub fn parse_filter(expression: &str) -> Vec<FilterPill> {
    let mut pills = Vec::new();
    let mut rest = match expression.find('[') {
        Some(start) => &expression[start..],
        None => return pills,
    };

    while let Some(body) = rest.strip_prefix('[') {
        let Some(close) = body.find(']') else {
            break;
        };
        let name = &body[..close];
        let after = &body[close + 1..];
        let value_end = after.find('[').unwrap_or(after.len());
        let pill = FilterPill::new(name, &after[..value_end]);
        if pill.is_active() {
            pills.push(pill);
        }
        rest = &after[value_end..];
    }

    pills
}
