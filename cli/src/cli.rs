use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use registry_check_core::{ClientConfig, DEFAULT_BASE_URL};

/// Fetch registry API endpoints and validate the JSON they return.
#[derive(Debug, Parser)]
#[command(name = "registry-check", version, about)]
pub struct Cli {
    /// API root the endpoints are appended to
    #[arg(long, global = true, env = "REGISTRY_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// More log output; repeat for more
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one endpoint, save body and status, validate, print the status
    Call {
        /// Endpoint path relative to the API root, e.g. `crates/serde`
        endpoint: String,
        /// Path expected to be present on a 200 response, e.g. `.crate`
        expect: String,
        /// File receiving the body; the status goes to `<OUTPUT>.http`
        output: PathBuf,
    },
    /// Fetch several endpoints inside a temporary workspace
    Scan {
        /// Path expected to be present on 200 responses
        #[arg(long, default_value = ".")]
        expect: String,
        /// Stop at the first 404 without marking the scan complete (exit 8)
        #[arg(long)]
        stop_on_not_found: bool,
        #[arg(required = true)]
        endpoints: Vec<String>,
    },
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}
