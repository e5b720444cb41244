//! Diagnostics and exit codes.
//!
//! # Design
//! `DiagnosticReporter` writes the one-line `<program>: error: <message>`
//! diagnostic (preceded by a visible-escapes dump of the offending body for
//! response failures) and hands back `ExitIntent::Failed`. It never exits
//! the process itself: the entry point returns the intent from `main`, so
//! scope guards such as `ScopedWorkspace` still run.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::error::CallError;

/// How the program is about to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitIntent {
    /// Work finished and success was marked explicitly.
    Completed,
    /// The owning scope ended before success was marked.
    Aborted,
    /// A failure was reported.
    Failed,
}

impl ExitIntent {
    pub const fn code(self) -> u8 {
        match self {
            ExitIntent::Completed => 0,
            ExitIntent::Aborted => 8,
            ExitIntent::Failed => 12,
        }
    }
}

impl From<ExitIntent> for ExitCode {
    fn from(intent: ExitIntent) -> Self {
        ExitCode::from(intent.code())
    }
}

/// Name of the running binary, for diagnostic prefixes.
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "registry-check".to_string())
}

/// Render bytes the way `cat -v` does: printable ASCII, newline and tab
/// pass through, other control bytes become `^X`, DEL becomes `^?`, and
/// bytes with the high bit set get an `M-` prefix.
pub fn escape_visible(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        let low = byte & 0x7f;
        if byte >= 0x80 {
            out.push_str("M-");
        }
        match low {
            b'\n' | b'\t' if byte < 0x80 => out.push(low as char),
            0x7f => out.push_str("^?"),
            0x00..=0x1f => {
                out.push('^');
                out.push((low + 0x40) as char);
            }
            _ => out.push(low as char),
        }
    }
    out
}

pub struct DiagnosticReporter<W = io::Stderr> {
    program: String,
    out: W,
}

impl DiagnosticReporter<io::Stderr> {
    pub fn stderr(program: impl Into<String>) -> Self {
        Self::new(program, io::stderr())
    }
}

impl<W: Write> DiagnosticReporter<W> {
    pub fn new(program: impl Into<String>, out: W) -> Self {
        Self {
            program: program.into(),
            out,
        }
    }

    /// Write `<program>: error: <message>` and return `ExitIntent::Failed`.
    pub fn fail(&mut self, message: impl Display) -> ExitIntent {
        // Nothing sensible to do if the diagnostic stream itself is gone.
        let _ = writeln!(self.out, "{}: error: {message}", self.program);
        let _ = self.out.flush();
        ExitIntent::Failed
    }

    /// Dump a response body in visible-escapes form.
    pub fn dump(&mut self, body: &[u8]) {
        let text = escape_visible(body);
        let _ = if text.ends_with('\n') {
            write!(self.out, "{text}")
        } else {
            writeln!(self.out, "{text}")
        };
    }

    /// Dump the body carried by `err` (if any), then `fail` with its message.
    pub fn report(&mut self, err: &CallError) -> ExitIntent {
        if let Some(body) = err.body() {
            self.dump(body);
        }
        self.fail(err)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
