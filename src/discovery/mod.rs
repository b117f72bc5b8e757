//! Repository discovery.
//!
//! [`search`] walks a directory tree, finds `.git` marker directories and
//! reads the branch each one has checked out. Policy (depth limit, excluded
//! names, what to do with unreadable repositories) comes from
//! [`SearchConfig`]; non-fatal problems go to a [`DiagnosticSink`].

pub mod head;
pub mod walk;

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, RjError};

pub use head::{BranchError, read_branch};
pub use walk::{WalkControl, Visitor, clean_path, path_depth, search, walk};

/// Directory name that marks its parent as a repository working directory.
pub const MARKER_DIR: &str = ".git";

pub const DEFAULT_EXCLUDE: &[&str] = &["node_modules"];
pub const DEFAULT_DEPTH_LIMIT: usize = 5;

/// A discovered repository working directory and its checked-out branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub branch: String,
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.branch)
    }
}

/// What to do when a marker directory is found but its branch can't be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UnreadablePolicy {
    /// Report the repository to the diagnostic sink and keep walking.
    #[default]
    Skip,
    /// Fail the whole search with the branch error.
    Abort,
}

impl UnreadablePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        }
    }
}

impl FromStr for UnreadablePolicy {
    type Err = RjError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(RjError::Config(format!(
                "invalid unreadable policy {other} (expected skip|abort)"
            ))),
        }
    }
}

/// Traversal policy for one [`search`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Directory basenames that are neither inspected nor descended into.
    pub excluded_names: HashSet<String>,
    /// Maximum number of path segments of a visited directory's path.
    /// Leading `.` components are not counted, so searching `.` reaches
    /// `a/b/c/d/.git` at the default of 5; with an absolute root the count
    /// starts at `/`.
    pub depth_limit: usize,
    pub on_unreadable: UnreadablePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            excluded_names: DEFAULT_EXCLUDE.iter().map(|name| (*name).to_string()).collect(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.depth_limit == 0 {
            return Err(RjError::InvalidDepthLimit(self.depth_limit));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        name.to_str()
            .is_some_and(|name| self.excluded_names.contains(name))
    }
}

/// A problem found during the walk that did not stop it.
#[derive(Debug)]
pub enum Diagnostic {
    /// A directory entry could not be read.
    Walk(walkdir::Error),
    /// A marker directory whose branch could not be determined.
    SkippedRepository { path: PathBuf, error: BranchError },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk(err) => write!(f, "{err}"),
            Self::SkippedRepository { path, error } => {
                write!(f, "skipped {}: {error}", path.display())
            }
        }
    }
}

/// Receives non-fatal walk problems. Never influences control flow.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that logs every diagnostic as a warning.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
    }
}

/// Sink that keeps diagnostics for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
