//! Stateless request builder and response validator for the registry API.
//!
//! # Design
//! `RegistryClient` holds only a normalized `base_url`. `build_get` produces
//! an `HttpRequest`; `check` consumes the matching `HttpResponse`. The
//! caller runs the round-trip in between, so everything here is
//! deterministic.
//!
//! Status classification picks the active expectation: the caller's for 200,
//! the error envelope for 404, and nothing at all for any other status.

use serde_json::Value;

use crate::error::CallError;
use crate::expect::Expectation;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

static ERROR_ENVELOPE: Expectation = Expectation::ErrorEnvelope;

#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: format!("{}/", base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `endpoint`. A leading `/` on the endpoint is ignored.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub fn build_get(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(endpoint),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    /// Validate `response` to `request` and return the parsed body.
    pub fn check(
        &self,
        request: &HttpRequest,
        response: &HttpResponse,
        expect: &Expectation,
    ) -> Result<Value, CallError> {
        let active = active_expectation(request, response, expect)?;

        let mismatch = || CallError::SchemaMismatch {
            url: request.url.clone(),
            expectation: active.to_string(),
            body: response.body.clone(),
        };

        let doc: Value = serde_json::from_slice(&response.body).map_err(|err| {
            tracing::debug!(url = %request.url, error = %err, "response body is not JSON");
            mismatch()
        })?;

        if !active.holds(&doc) {
            return Err(mismatch());
        }
        Ok(doc)
    }
}

/// Map the final status to the expectation that applies to it.
fn active_expectation<'a>(
    request: &HttpRequest,
    response: &HttpResponse,
    expect: &'a Expectation,
) -> Result<&'a Expectation, CallError> {
    match response.status {
        200 => Ok(expect),
        404 => Ok(&ERROR_ENVELOPE),
        status => Err(CallError::UnexpectedStatus {
            status,
            url: request.url.clone(),
            body: response.body.clone(),
        }),
    }
}
