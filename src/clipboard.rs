//! Clipboard side effect.
//!
//! The chosen directory is turned into a `cd` command and handed to a
//! [`ClipboardSink`]. [`SystemClipboard`] pipes the text into whichever
//! clipboard utility the platform has; it is resolved once at startup and
//! reused for the rest of the process.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Result, RjError};

pub const CD_PREFIX: &str = "cd ";

/// Utilities tried in order, with the environment variable that must be set
/// for each to be usable.
const CANDIDATES: &[(&str, &[&str], Option<&str>)] = &[
    ("wl-copy", &[], Some("WAYLAND_DISPLAY")),
    ("xclip", &["-selection", "clipboard"], Some("DISPLAY")),
    ("xsel", &["--clipboard", "--input"], Some("DISPLAY")),
    ("pbcopy", &[], None),
    ("clip.exe", &[], None),
];

/// Shell command that changes into `path`.
#[must_use]
pub fn cd_command(path: &Path) -> String {
    format!("{CD_PREFIX}{}", path.display())
}

pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by an external utility reading stdin.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    program: PathBuf,
    args: Vec<String>,
}

impl SystemClipboard {
    /// Resolve the clipboard utility: `command` when configured, otherwise
    /// the first usable entry of the built-in list.
    pub fn detect(command: Option<&str>) -> Result<Self> {
        if let Some(command) = command {
            return Self::from_command(command);
        }

        for (program, args, required_env) in CANDIDATES {
            if required_env.is_some_and(|var| std::env::var_os(var).is_none()) {
                continue;
            }
            if let Ok(path) = which::which(program) {
                debug!(program = %path.display(), "using clipboard utility");
                return Ok(Self {
                    program: path,
                    args: args.iter().map(|arg| (*arg).to_string()).collect(),
                });
            }
        }

        Err(RjError::Clipboard(
            "no clipboard utility found (tried wl-copy, xclip, xsel, pbcopy, clip.exe); \
             set [clipboard] command or use --print"
                .to_string(),
        ))
    }

    fn from_command(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| RjError::Clipboard("clipboard command is empty".to_string()))?;
        let program = which::which(program)
            .map_err(|err| RjError::Clipboard(format!("{program}: {err}")))?;
        Ok(Self {
            program,
            args: parts.map(ToString::to_string).collect(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| RjError::Clipboard(format!("{}: {err}", self.program.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A utility that exits early closes the pipe; its exit status
            // carries the real failure.
            if let Err(err) = stdin.write_all(text.as_bytes()) {
                if err.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RjError::Clipboard(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// In-process clipboard, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cd_command_is_plain_concatenation() {
        assert_eq!(cd_command(Path::new("./a")), "cd ./a");
        assert_eq!(cd_command(Path::new("/proj/my repo")), "cd /proj/my repo");
    }

    #[test]
    fn memory_clipboard_keeps_last_write() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.write_text("cd one").unwrap();
        clipboard.write_text("cd two").unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("cd two"));
    }

    #[test]
    fn empty_override_is_rejected() {
        let err = SystemClipboard::detect(Some("   ")).unwrap_err();
        assert!(matches!(err, RjError::Clipboard(_)));
    }

    #[test]
    fn unknown_override_is_rejected() {
        let err = SystemClipboard::detect(Some("definitely-not-a-clipboard-tool-rj")).unwrap_err();
        assert!(matches!(err, RjError::Clipboard(_)));
    }

    #[cfg(unix)]
    #[test]
    fn override_receives_text_on_stdin() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("clip.txt");
        let mut clipboard =
            SystemClipboard::detect(Some(&format!("tee {}", target.display()))).unwrap();

        clipboard.write_text("cd /proj/a").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "cd /proj/a");
    }

    #[cfg(unix)]
    #[test]
    fn failing_utility_is_an_error() {
        let mut clipboard = SystemClipboard::detect(Some("false")).unwrap();
        let err = clipboard.write_text("cd /x").unwrap_err();
        assert!(matches!(err, RjError::Clipboard(_)), "got {err:?}");
    }
}
