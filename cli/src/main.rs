//! `registry-check` entry point.
//!
//! The only place a `CallError` becomes a process exit code: 0 when the
//! work completed, 8 when a scan stopped early at a 404 without marking
//! success, 12 after a reported failure.

mod cli;
mod logging;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use registry_check_core::{
    program_name, run_scoped, ApiCaller, DiagnosticReporter, ExitIntent, Expectation,
};

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let args = Cli::parse();
    logging::setup_logging(&args);

    let mut reporter = DiagnosticReporter::stderr(program_name());
    let caller = ApiCaller::new(&args.client_config());

    let intent = match &args.command {
        Command::Call {
            endpoint,
            expect,
            output,
        } => call(&caller, &mut reporter, endpoint, expect, output),
        Command::Scan {
            expect,
            stop_on_not_found,
            endpoints,
        } => scan(&caller, &mut reporter, expect, *stop_on_not_found, endpoints),
    };
    intent.into()
}

fn call<W: Write>(
    caller: &ApiCaller,
    reporter: &mut DiagnosticReporter<W>,
    endpoint: &str,
    expect: &str,
    output: &Path,
) -> ExitIntent {
    match caller.call_str(endpoint, expect, output) {
        Ok(outcome) => {
            println!("{}", outcome.status);
            ExitIntent::Completed
        }
        Err(err) => reporter.report(&err),
    }
}

fn scan<W: Write>(
    caller: &ApiCaller,
    reporter: &mut DiagnosticReporter<W>,
    expect: &str,
    stop_on_not_found: bool,
    endpoints: &[String],
) -> ExitIntent {
    let expect = match Expectation::key(expect) {
        Ok(expect) => expect,
        Err(err) => return reporter.report(&err),
    };

    run_scoped(reporter, |ws| {
        for (index, endpoint) in endpoints.iter().enumerate() {
            let output = ws.path().join(format!("{index}.json"));
            let outcome = caller.call(endpoint, &expect, &output)?;
            for detail in &outcome.errors {
                tracing::info!(endpoint = %endpoint, "{detail}");
            }
            println!("{} {endpoint}", outcome.status);
            if stop_on_not_found && outcome.is_not_found() {
                tracing::warn!(endpoint = %endpoint, "stopping at missing endpoint");
                return Ok(());
            }
        }
        ws.finish_ok();
        Ok(())
    })
}
