//! Registry DTOs.
//!
//! # Design
//! Only the documented error envelope is modelled. Success payloads are
//! left as `serde_json::Value`; their shape is the caller's business and is
//! checked with an `Expectation` rather than deserialized.

use serde::{Deserialize, Serialize};

/// The registry's error envelope, e.g. `{"errors":[{"detail":"Not Found"}]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub errors: Vec<ErrorDetail>,
}

/// A single entry of the error envelope. `detail` is optional in practice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorEnvelope {
    /// Extract the `detail` strings from a parsed document, skipping entries
    /// without a string `detail`. Returns an empty list when the document is
    /// not an envelope.
    pub fn details(doc: &serde_json::Value) -> Vec<String> {
        doc.get("errors")
            .and_then(serde_json::Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|entry| ErrorDetail::deserialize(entry).ok())
            .filter_map(|entry| entry.detail)
            .collect()
    }
}
