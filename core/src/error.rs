//! Error types for registry API calls.
//!
//! # Design
//! The two response-level failures, `UnexpectedStatus` and `SchemaMismatch`,
//! carry the raw body so the reporter can dump it. Everything else (bad
//! expectation syntax, transport, filesystem) carries only what is needed
//! to name the failure. No variant is retried anywhere.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `ApiCaller`, `RegistryClient` and `ScopedWorkspace`.
#[derive(Debug, Error)]
pub enum CallError {
    /// The final status was neither 200 nor 404.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String, body: Vec<u8> },

    /// The body is not JSON, or does not satisfy the active expectation.
    #[error("response from {url} does not satisfy `{expectation}`")]
    SchemaMismatch {
        url: String,
        expectation: String,
        body: Vec<u8>,
    },

    #[error("invalid expectation `{expr}`: {reason}")]
    InvalidExpectation { expr: String, reason: String },

    /// No HTTP response was received at all.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },

    /// The response arrived but its body could not be read to the end.
    #[error("reading response body from {url} failed: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error while {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CallError {
    /// The response body for failures that have one.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            CallError::UnexpectedStatus { body, .. } | CallError::SchemaMismatch { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        CallError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
