//! Temporary directory trees containing fake repositories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::discovery::MARKER_DIR;
use crate::discovery::head::HEAD_FILE;

/// A temp directory that tests populate with working directories and
/// `.git/HEAD` files. Removed on drop.
pub struct RepoFixture {
    pub temp_dir: TempDir,
}

impl Default for RepoFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a directory (and its parents) below the root.
    pub fn create_dir(&self, relative_path: &str) -> PathBuf {
        let full_path = self.root().join(relative_path);
        std::fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create a file with content below the root.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create a working directory whose `HEAD` points at `branch`.
    pub fn create_repo(&self, relative_path: &str, branch: &str) -> PathBuf {
        self.create_broken_repo(relative_path, &format!("ref: refs/heads/{branch}\n"))
    }

    /// Create a working directory with arbitrary `HEAD` contents.
    pub fn create_broken_repo(&self, relative_path: &str, head: &str) -> PathBuf {
        let git_dir = Path::new(relative_path).join(MARKER_DIR);
        self.create_file(&git_dir.join(HEAD_FILE).to_string_lossy(), head);
        self.create_dir(&git_dir.join("refs").join("heads").to_string_lossy());
        self.root().join(relative_path)
    }
}
