//! Controller options, merged over the defaults by serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Quiet period for debounced triggers.
pub const DEFAULT_DEBOUNCE_MS: u32 = 250;

/// How often the hash fallback checks `location.hash`.
pub const DEFAULT_HASH_POLL_MS: u32 = 80;

const DEFAULT_TRIGGER_SELECTOR: &str = r#"input[type="radio"], input[type="checkbox"]"#;

/// What makes the filter update: a selector, optionally debounced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Trigger {
    Selector(String),
    Detailed {
        selector: String,
        #[serde(default)]
        debounce: bool,
    },
}

impl Trigger {
    pub fn selector(&self) -> &str {
        match self {
            Trigger::Selector(selector) | Trigger::Detailed { selector, .. } => selector,
        }
    }

    pub fn debounced(&self) -> bool {
        matches!(self, Trigger::Detailed { debounce: true, .. })
    }
}

/// Caller options. Hooks and subscribers are not plain data and travel separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Set to `false` to keep using the hash even where push-state exists.
    pub use_push_state: bool,
    /// Merged over the default request headers; same-named headers win.
    pub additional_headers: BTreeMap<String, String>,
    /// Event name to trigger.
    pub triggers: BTreeMap<String, Trigger>,
    /// Target URL; the form's `action` attribute when absent.
    pub action: Option<String>,
    pub debounce_ms: u32,
    pub hash_poll_ms: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_push_state: true,
            additional_headers: BTreeMap::new(),
            triggers: BTreeMap::from([(
                "change".to_string(),
                Trigger::Selector(DEFAULT_TRIGGER_SELECTOR.to_string()),
            )]),
            action: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            hash_poll_ms: DEFAULT_HASH_POLL_MS,
        }
    }
}

impl Options {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
