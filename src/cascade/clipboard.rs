//! Best-effort report copying
//!
//! The report goes to the system clipboard when a clipboard command is
//! available, otherwise it is written to a fallback file. When both fail the
//! full report is dumped to the given writer so it can be copied by hand.
//! None of this ever fails the inspection.

use log::{info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Something a report can be copied into
pub trait ClipboardBackend {
    fn name(&self) -> String;
    fn copy(&self, text: &str) -> io::Result<()>;
}

/// Clipboard reached through a platform command reading from stdin
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The clipboard command of the current platform
    pub fn system() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", &[])
        } else if cfg!(target_os = "windows") {
            Self::new("clip", &[])
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", &[])
        } else {
            Self::new("xclip", &["-selection", "clipboard"])
        }
    }
}

impl ClipboardBackend for CommandClipboard {
    fn name(&self) -> String {
        self.program.clone()
    }

    fn copy(&self, text: &str) -> io::Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", self.program, status)))
        }
    }
}

/// Fallback copy target: a file the user can open
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `last_report.md` next to the log file
    pub fn default_location() -> Self {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("CascadeProbe");
        Self::new(dir.join("last_report.md"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClipboardBackend for FileClipboard {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn copy(&self, text: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)
    }
}

/// Where the report ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Primary(String),
    Fallback(String),
    Dumped,
}

/// Copy `text` with the primary backend, then the fallback, then dump it to `dump`
pub fn copy_with_fallback(
    text: &str,
    primary: &dyn ClipboardBackend,
    fallback: &dyn ClipboardBackend,
    dump: &mut dyn Write,
) -> CopyOutcome {
    match primary.copy(text) {
        Ok(()) => {
            info!("Report copied to clipboard via {}", primary.name());
            return CopyOutcome::Primary(primary.name());
        }
        Err(e) => warn!("Clipboard copy via {} failed: {}", primary.name(), e),
    }

    match fallback.copy(text) {
        Ok(()) => {
            info!("Report saved to {}", fallback.name());
            return CopyOutcome::Fallback(fallback.name());
        }
        Err(e) => warn!("Fallback copy to {} failed: {}", fallback.name(), e),
    }

    let _ = writeln!(dump, "Copy the report below manually:");
    let _ = writeln!(dump, "{}", text);
    CopyOutcome::Dumped
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingClipboard;

    impl ClipboardBackend for FailingClipboard {
        fn name(&self) -> String {
            "failing".to_string()
        }

        fn copy(&self, _text: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_fallback_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = FileClipboard::new(dir.path().join("out").join("report.md"));
        let mut dump = Vec::new();

        let outcome = copy_with_fallback("# report", &FailingClipboard, &fallback, &mut dump);

        assert!(matches!(outcome, CopyOutcome::Fallback(_)));
        assert_eq!(fs::read_to_string(fallback.path()).unwrap(), "# report");
        assert!(dump.is_empty());
    }

    #[test]
    fn test_dump_when_everything_fails() {
        let mut dump = Vec::new();
        let outcome = copy_with_fallback("# report", &FailingClipboard, &FailingClipboard, &mut dump);

        assert_eq!(outcome, CopyOutcome::Dumped);
        let dumped = String::from_utf8(dump).unwrap();
        assert!(dumped.contains("# report"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_kills_and_reports() {
        // `true` exits without reading, the write then fails with a broken pipe
        let clipboard = CommandClipboard::new("true", &[]);
        let large = "x".repeat(1 << 20);
        assert!(clipboard.copy(&large).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_status() {
        let clipboard = CommandClipboard::new("false", &[]);
        let err = clipboard.copy("text").unwrap_err();
        assert!(err.to_string().contains("false exited with"));
    }

    #[test]
    fn test_missing_command_fails_cleanly() {
        let clipboard = CommandClipboard::new("cascade-probe-no-such-command", &[]);
        assert!(clipboard.copy("text").is_err());
    }
}
