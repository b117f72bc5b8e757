//! Error types for rj.

use std::path::PathBuf;

use thiserror::Error;

use crate::discovery::BranchError;

pub type Result<T> = std::result::Result<T, RjError>;

#[derive(Debug, Error)]
pub enum RjError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("search root {} is not a readable directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("depth limit must be at least 1 (got {0})")]
    InvalidDepthLimit(usize),

    #[error("{}: {source}", .path.display())]
    Branch {
        path: PathBuf,
        #[source]
        source: BranchError,
    },

    #[error("no result found")]
    NoResults,

    #[error("selection cancelled")]
    Cancelled,

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("terminal error: {0}")]
    Terminal(String),
}

impl RjError {
    /// Stable machine-readable code used for robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::RootNotDirectory(_) => "root_not_directory",
            Self::InvalidDepthLimit(_) => "invalid_depth_limit",
            Self::Branch { source, .. } => source.code(),
            Self::NoResults => "no_results",
            Self::Cancelled => "cancelled",
            Self::Clipboard(_) => "clipboard",
            Self::Terminal(_) => "terminal",
        }
    }
}
