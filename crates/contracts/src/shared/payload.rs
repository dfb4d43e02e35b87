use serde::{Deserialize, Serialize};

/// Body of a filter response, parsed according to the negotiated `Accept` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

