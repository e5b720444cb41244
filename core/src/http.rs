//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `RegistryClient` builds an
//! `HttpRequest` and classifies an `HttpResponse` without touching the
//! network; a `Transport` performs the round-trip in between. Tests swap in
//! canned responses at that seam.
//!
//! The body is kept as raw bytes: a registry error page is not guaranteed to
//! be UTF-8, and the diagnostic dump needs the exact bytes.

/// HTTP method for a request. The registry API is read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// `final_url` is where the request ended up after redirects were followed;
/// it equals the request URL when there were none.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub final_url: String,
}

impl HttpResponse {
    /// Convenience constructor for a response that was not redirected.
    pub fn new(status: u16, body: impl Into<Vec<u8>>, url: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            final_url: url.to_string(),
        }
    }

    pub fn was_redirected(&self, requested: &str) -> bool {
        self.final_url != requested
    }
}
