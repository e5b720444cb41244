//! Scoped temporary workspace.
//!
//! # Design
//! `ScopedWorkspace` owns a uniquely named directory and removes it when
//! dropped: on normal return, on early return through `?`, and while a
//! panic unwinds. It also tracks the exit intent of its scope, which starts
//! at `Aborted` and only becomes `Completed` through `finish_ok`. Removal
//! errors during drop are ignored so cleanup always runs to the end; use
//! `close` to observe them.

use std::io::Write;
use std::path::Path;

use tempfile::TempDir;

use crate::error::CallError;
use crate::report::{DiagnosticReporter, ExitIntent};

const PREFIX: &str = "registry-check.";

#[derive(Debug)]
pub struct ScopedWorkspace {
    dir: TempDir,
    intent: ExitIntent,
}

impl ScopedWorkspace {
    /// Create a fresh directory under the system temp dir.
    pub fn setup() -> Result<Self, CallError> {
        Self::setup_in(std::env::temp_dir())
    }

    /// Create a fresh directory under `parent`.
    pub fn setup_in(parent: impl AsRef<Path>) -> Result<Self, CallError> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(parent)
            .map_err(|e| CallError::io("creating workspace in", parent, e))?;
        tracing::debug!(path = %dir.path().display(), "workspace created");
        Ok(Self {
            dir,
            intent: ExitIntent::Aborted,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn exit_intent(&self) -> ExitIntent {
        self.intent
    }

    /// Mark the scope's work as intentionally completed.
    pub fn finish_ok(&mut self) {
        self.intent = ExitIntent::Completed;
    }

    /// Remove the directory now, reporting removal errors.
    pub fn close(self) -> Result<ExitIntent, CallError> {
        let path = self.dir.path().to_path_buf();
        let intent = self.intent;
        self.dir
            .close()
            .map_err(|e| CallError::io("removing workspace", &path, e))?;
        tracing::debug!(path = %path.display(), ?intent, "workspace removed");
        Ok(intent)
    }
}

/// Run `body` inside a fresh workspace and turn the result into an exit
/// intent: `Failed` after reporting an error, otherwise whatever the body
/// left tracked (`Completed` only if it called `finish_ok`). The directory
/// is gone by the time this returns.
pub fn run_scoped<W, F>(reporter: &mut DiagnosticReporter<W>, body: F) -> ExitIntent
where
    W: Write,
    F: FnOnce(&mut ScopedWorkspace) -> Result<(), CallError>,
{
    let mut workspace = match ScopedWorkspace::setup() {
        Ok(workspace) => workspace,
        Err(err) => return reporter.report(&err),
    };

    let result = body(&mut workspace);
    let intent = workspace.exit_intent();
    drop(workspace);

    match result {
        Ok(()) => intent,
        Err(err) => reporter.report(&err),
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::path::PathBuf;

    use super::*;

    fn reporter() -> DiagnosticReporter<Vec<u8>> {
        DiagnosticReporter::new("registry-check", Vec::new())
    }

    #[test]
    fn setup_creates_unique_empty_directories() {
        let parent = tempfile::tempdir().unwrap();
        let a = ScopedWorkspace::setup_in(parent.path()).unwrap();
        let b = ScopedWorkspace::setup_in(parent.path()).unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        assert_eq!(std::fs::read_dir(a.path()).unwrap().count(), 0);
        assert!(a
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("registry-check."));
        assert_eq!(a.exit_intent(), ExitIntent::Aborted);
    }

    #[test]
    fn drop_removes_directory_with_contents() {
        let ws = ScopedWorkspace::setup().unwrap();
        let path = ws.path().to_path_buf();
        std::fs::write(path.join("body.json"), "{}").unwrap();
        std::fs::create_dir(path.join("nested")).unwrap();
        drop(ws);
        assert!(!path.exists());
    }

    #[test]
    fn finish_ok_sets_completed() {
        let mut ws = ScopedWorkspace::setup().unwrap();
        ws.finish_ok();
        let path = ws.path().to_path_buf();
        assert_eq!(ws.close().unwrap(), ExitIntent::Completed);
        assert!(!path.exists());
    }

    #[test]
    fn close_without_finish_is_aborted() {
        let ws = ScopedWorkspace::setup().unwrap();
        assert_eq!(ws.close().unwrap(), ExitIntent::Aborted);
    }

    #[test]
    fn setup_in_missing_parent_fails() {
        let parent = tempfile::tempdir().unwrap();
        let err = ScopedWorkspace::setup_in(parent.path().join("missing")).unwrap_err();
        assert!(matches!(err, CallError::Io { .. }));
    }

    #[test]
    fn run_scoped_completed() {
        let mut seen = PathBuf::new();
        let mut r = reporter();
        let intent = run_scoped(&mut r, |ws| {
            seen = ws.path().to_path_buf();
            ws.finish_ok();
            Ok(())
        });
        assert_eq!(intent, ExitIntent::Completed);
        assert!(!seen.as_os_str().is_empty());
        assert!(!seen.exists());
        assert!(r.into_inner().is_empty());
    }

    #[test]
    fn run_scoped_without_finish_is_aborted() {
        let mut seen = PathBuf::new();
        let mut r = reporter();
        let intent = run_scoped(&mut r, |ws| {
            seen = ws.path().to_path_buf();
            Ok(())
        });
        assert_eq!(intent, ExitIntent::Aborted);
        assert!(!seen.exists());
        assert!(r.into_inner().is_empty());
    }

    #[test]
    fn run_scoped_error_is_reported_and_cleaned_up() {
        let mut seen = PathBuf::new();
        let mut r = reporter();
        let intent = run_scoped(&mut r, |ws| {
            seen = ws.path().to_path_buf();
            Err(CallError::UnexpectedStatus {
                status: 503,
                url: "https://crates.io/api/v1/crates/serde".to_string(),
                body: b"down".to_vec(),
            })
        });
        assert_eq!(intent, ExitIntent::Failed);
        assert!(!seen.exists());
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert!(out.ends_with(
            "registry-check: error: unexpected HTTP status 503 from https://crates.io/api/v1/crates/serde\n"
        ));
    }

    #[test]
    fn error_after_finish_ok_still_fails() {
        let mut r = reporter();
        let intent = run_scoped(&mut r, |ws| {
            ws.finish_ok();
            Err(CallError::InvalidExpectation {
                expr: "x".to_string(),
                reason: "late".to_string(),
            })
        });
        assert_eq!(intent, ExitIntent::Failed);
    }

    #[test]
    fn panic_unwind_removes_directory() {
        let mut seen = PathBuf::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let ws = ScopedWorkspace::setup().unwrap();
            seen = ws.path().to_path_buf();
            panic!("interrupted");
        }));
        assert!(result.is_err());
        assert!(!seen.exists());
    }
}
