//! The HTTP round-trip between `RegistryClient::build_get` and `check`.
//!
//! `UreqTransport` disables ureq's status-as-error behavior so 4xx/5xx
//! responses come back as data for the client to classify. Redirects are
//! followed by the agent; only the final response is returned, with the URL
//! it was served from. The body is streamed in full, with no size limit.

use std::io;

use ureq::ResponseExt;

use crate::config::ClientConfig;
use crate::error::CallError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes an `HttpRequest` and returns the final `HttpResponse`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CallError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CallError> {
        let transport_error = |source: ureq::Error| CallError::Transport {
            url: request.url.clone(),
            source,
        };

        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        tracing::debug!(url = %request.url, "GET");
        let response = builder.call().map_err(transport_error)?;

        let status = response.status().as_u16();
        let final_url = response.get_uri().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let mut body = Vec::new();
        let mut reader = response.into_body().into_reader();
        io::copy(&mut reader, &mut body).map_err(|source| CallError::BodyRead {
            url: request.url.clone(),
            source,
        })?;

        tracing::debug!(status, final_url = %final_url, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
            final_url,
        })
    }
}
