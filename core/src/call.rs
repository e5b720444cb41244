//! The API-call primitive: one GET, persisted and validated.
//!
//! # Design
//! `ApiCaller` composes the pure `RegistryClient` with a `Transport`. Every
//! received response is written to disk before it is validated, so the
//! body file and its `.http` companion exist on success and on failure
//! alike. Failures come back as `CallError`; deciding to end the program is
//! left to the outermost caller.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::RegistryClient;
use crate::config::ClientConfig;
use crate::error::CallError;
use crate::expect::Expectation;
use crate::http::HttpResponse;
use crate::transport::{Transport, UreqTransport};
use crate::types::ErrorEnvelope;

/// Result of a call whose response passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Final HTTP status, always 200 or 404.
    pub status: u16,
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    pub body_path: PathBuf,
    pub status_path: PathBuf,
    /// `detail` strings of the error envelope on 404; empty on 200.
    pub errors: Vec<String>,
}

impl CallOutcome {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Path of the file holding the textual status code: `output` + `.http`.
pub fn status_path(output: &Path) -> PathBuf {
    let mut path = OsString::from(output.as_os_str());
    path.push(".http");
    PathBuf::from(path)
}

pub struct ApiCaller<T = UreqTransport> {
    client: RegistryClient,
    transport: T,
}

impl ApiCaller<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::new(config))
    }
}

impl<T: Transport> ApiCaller<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: RegistryClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &RegistryClient {
        &self.client
    }

    /// GET `endpoint`, write the body to `output` and the status to
    /// `output.http`, then validate the body against `expect` (200) or the
    /// error envelope (404).
    pub fn call(
        &self,
        endpoint: &str,
        expect: &Expectation,
        output: &Path,
    ) -> Result<CallOutcome, CallError> {
        let request = self.client.build_get(endpoint);
        let response = self.transport.execute(&request)?;

        if response.was_redirected(&request.url) {
            tracing::warn!(
                url = %request.url,
                final_url = %response.final_url,
                "request was redirected"
            );
        }

        let status_path = write_outputs(output, &response)?;
        let doc = self.client.check(&request, &response, expect)?;

        let errors = if response.status == 404 {
            ErrorEnvelope::details(&doc)
        } else {
            Vec::new()
        };
        tracing::debug!(url = %request.url, status = response.status, "response validated");

        Ok(CallOutcome {
            status: response.status,
            url: request.url,
            final_url: response.final_url,
            body_path: output.to_path_buf(),
            status_path,
            errors,
        })
    }

    /// Like `call`, with the expectation given as a path expression.
    pub fn call_str(
        &self,
        endpoint: &str,
        expect_key: &str,
        output: &Path,
    ) -> Result<CallOutcome, CallError> {
        let expect = Expectation::key(expect_key)?;
        self.call(endpoint, &expect, output)
    }
}

fn write_outputs(output: &Path, response: &HttpResponse) -> Result<PathBuf, CallError> {
    fs::write(output, &response.body).map_err(|e| CallError::io("writing", output, e))?;

    let status_path = status_path(output);
    fs::write(&status_path, response.status.to_string())
        .map_err(|e| CallError::io("writing", &status_path, e))?;

    tracing::debug!(body = %output.display(), status = %status_path.display(), "response saved");
    Ok(status_path)
}
