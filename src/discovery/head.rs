//! Branch lookup from a repository's `HEAD` file.
//!
//! Only the symbolic form `ref: refs/heads/<name>` yields a branch. Anything
//! else (a detached object id, a ref outside `refs/heads/`, garbage) is
//! reported as a [`BranchError`] so callers can decide whether to skip the
//! repository or stop.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Name of the head-pointer file inside a metadata directory.
pub const HEAD_FILE: &str = "HEAD";

const BRANCH_REF_PREFIX: &str = "ref: refs/heads/";

#[derive(Debug, Error)]
pub enum BranchError {
    #[error("cannot find 'HEAD' file in {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HEAD is detached at {commit}")]
    Detached { commit: String },

    #[error("unrecognized HEAD contents: {content:?}")]
    Malformed { content: String },
}

impl BranchError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "head_not_found",
            Self::Io { .. } => "head_unreadable",
            Self::Detached { .. } => "detached_head",
            Self::Malformed { .. } => "malformed_head",
        }
    }
}

/// Read the checked-out branch of the repository whose metadata directory is
/// `metadata_dir` (usually a `.git` directory).
///
/// Only the immediate children of `metadata_dir` are considered.
pub fn read_branch(metadata_dir: &Path) -> Result<String, BranchError> {
    let head_path = find_head(metadata_dir)?;
    let content = std::fs::read_to_string(&head_path).map_err(|source| BranchError::Io {
        path: head_path.clone(),
        source,
    })?;
    parse_head(&content)
}

fn find_head(metadata_dir: &Path) -> Result<PathBuf, BranchError> {
    let entries = std::fs::read_dir(metadata_dir).map_err(|source| BranchError::Io {
        path: metadata_dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| BranchError::Io {
            path: metadata_dir.to_path_buf(),
            source,
        })?;
        if entry.file_name() != HEAD_FILE {
            continue;
        }
        let is_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
        if is_dir {
            break;
        }
        return Ok(entry.path());
    }

    Err(BranchError::NotFound(metadata_dir.to_path_buf()))
}

/// Extract the branch name from the text of a `HEAD` file.
pub fn parse_head(content: &str) -> Result<String, BranchError> {
    let trimmed = content.trim();

    if let Some(rest) = trimmed.strip_prefix(BRANCH_REF_PREFIX) {
        let name = rest.trim();
        if name.is_empty() {
            return Err(BranchError::Malformed {
                content: content.to_string(),
            });
        }
        return Ok(name.to_string());
    }

    if is_object_id(trimmed) {
        return Err(BranchError::Detached {
            commit: trimmed.to_string(),
        });
    }

    Err(BranchError::Malformed {
        content: content.to_string(),
    })
}

// SHA-1 (40) or SHA-256 (64) hex object ids.
fn is_object_id(value: &str) -> bool {
    matches!(value.len(), 40 | 64) && value.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_dir_with_head(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(HEAD_FILE), content).unwrap();
        dir
    }

    #[test]
    fn reads_symbolic_branch() {
        let dir = git_dir_with_head("ref: refs/heads/main\n");
        assert_eq!(read_branch(dir.path()).unwrap(), "main");
    }

    #[test]
    fn keeps_slashes_in_branch_names() {
        let dir = git_dir_with_head("ref: refs/heads/feature/login-form\r\n");
        assert_eq!(read_branch(dir.path()).unwrap(), "feature/login-form");
    }

    #[test]
    fn missing_head_is_not_found() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config"), "[core]\n").unwrap();
        let err = read_branch(dir.path()).unwrap_err();
        assert!(matches!(err, BranchError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn head_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(HEAD_FILE)).unwrap();
        let err = read_branch(dir.path()).unwrap_err();
        assert!(matches!(err, BranchError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn head_is_not_searched_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("worktrees").join("other");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join(HEAD_FILE), "ref: refs/heads/other\n").unwrap();
        let err = read_branch(dir.path()).unwrap_err();
        assert!(matches!(err, BranchError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn detached_head_is_reported() {
        let sha = "a1b2c3d4e5f60718293a4b5c6d7e8f9012345678";
        let dir = git_dir_with_head(&format!("{sha}\n"));
        match read_branch(dir.path()).unwrap_err() {
            BranchError::Detached { commit } => assert_eq!(commit, sha),
            other => panic!("expected detached error, got {other:?}"),
        }
    }

    #[test]
    fn non_branch_ref_is_malformed() {
        let err = parse_head("ref: refs/remotes/origin/main\n").unwrap_err();
        assert!(matches!(err, BranchError::Malformed { .. }), "got {err:?}");
    }

    #[test]
    fn empty_branch_name_is_malformed() {
        let err = parse_head("ref: refs/heads/   \n").unwrap_err();
        assert!(matches!(err, BranchError::Malformed { .. }), "got {err:?}");
    }

    #[test]
    fn empty_file_is_malformed() {
        let err = parse_head("").unwrap_err();
        assert!(matches!(err, BranchError::Malformed { .. }), "got {err:?}");
    }

    #[test]
    fn error_codes_are_distinct() {
        let codes = [
            BranchError::NotFound(PathBuf::from(".git")).code(),
            BranchError::Detached {
                commit: String::new(),
            }
            .code(),
            BranchError::Malformed {
                content: String::new(),
            }
            .code(),
        ];
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }
}
