//! Fetch-and-validate primitive for package registry APIs.
//!
//! # Overview
//! `ApiCaller::call` issues one GET against the registry, saves the body and
//! its status code, and checks the body against a JSON expectation chosen by
//! status: the caller's for 200, the registry error envelope for 404.
//! Anything else is an error. `ScopedWorkspace` gives callers a temporary
//! directory that is removed on every way out of its scope, and tracks
//! whether the scope finished on purpose.
//!
//! # Design
//! - `RegistryClient` is stateless and does no I/O; `Transport` is the seam
//!   where the HTTP round-trip happens.
//! - Failures are returned as `CallError`. Only the binary turns them into
//!   an exit code, through `DiagnosticReporter` and `ExitIntent`.

pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod expect;
pub mod http;
pub mod report;
pub mod transport;
pub mod types;
pub mod workspace;

pub use call::{status_path, ApiCaller, CallOutcome};
pub use client::RegistryClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::CallError;
pub use expect::{Expectation, KeyPath, Segment};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use report::{escape_visible, program_name, DiagnosticReporter, ExitIntent};
pub use transport::{Transport, UreqTransport};
pub use types::{ErrorDetail, ErrorEnvelope};
pub use workspace::{run_scoped, ScopedWorkspace};
