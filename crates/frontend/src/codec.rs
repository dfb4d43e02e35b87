//! Conversion between `application/x-www-form-urlencoded` query strings and [`FilterState`].

use std::collections::BTreeMap;

use contracts::shared::{FilterState, FilterValue};

/// Cuts a query at the first stray `?` or `#` marker.
pub fn truncate_query(query: &str) -> &str {
    match query.find(&['?', '#'][..]) {
        Some(idx) => &query[..idx],
        None => query,
    }
}

/// Form-decodes one component: `+` is a space, then percent escapes.
/// Malformed escapes are kept verbatim.
pub fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Form-encodes one component (spaces become `+`).
pub fn encode_component(raw: &str) -> String {
    urlencoding::encode(raw).replace("%20", "+")
}

/// Decodes a query string into a filter state.
///
/// Entries without a value are dropped, repeated names accumulate in order and a
/// single occurrence collapses to a scalar. Empty input gives an empty state.
pub fn decode(query: &str) -> FilterState {
    let query = truncate_query(query.trim_start_matches('?'));

    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.splitn(2, '=');
        let name = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default();
        if name.is_empty() || value.is_empty() {
            continue;
        }

        fields
            .entry(decode_component(name))
            .or_default()
            .push(decode_component(value));
    }

    fields
        .into_iter()
        .filter_map(|(name, values)| FilterValue::from_values(values).map(|value| (name, value)))
        .collect()
}

/// Encodes `(name, value)` pairs in order, skipping empty values.
pub fn encode<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Encodes a state back into a query string.
pub fn encode_state(state: &FilterState) -> String {
    encode(
        state
            .iter()
            .flat_map(|(name, value)| value.values().into_iter().map(move |v| (name, v))),
    )
}
