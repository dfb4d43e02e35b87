use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of one filter field: a scalar, or every value of a multi-valued field
/// in the order it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FilterValue {
    /// Whether `value` is one of the values of this field
    pub fn contains(&self, value: &str) -> bool {
        match self {
            FilterValue::Single(v) => v == value,
            FilterValue::Multiple(values) => values.iter().any(|v| v == value),
        }
    }

    /// First value, used for controls that can only hold one
    pub fn first(&self) -> Option<&str> {
        match self {
            FilterValue::Single(v) => Some(v.as_str()),
            FilterValue::Multiple(values) => values.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Single(v) => vec![v.as_str()],
            FilterValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Collapses a list of one into a scalar.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(FilterValue::Single),
            _ => Some(FilterValue::Multiple(values)),
        }
    }
}

/// Field name to value(s), as decoded from a query string or read off a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    fields: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FilterValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FilterValue)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
