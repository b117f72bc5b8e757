//! Depth-first directory walk with explicit visitor control.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use super::head::read_branch;
use super::{
    Diagnostic, DiagnosticSink, DirectoryEntry, MARKER_DIR, SearchConfig, UnreadablePolicy,
};
use crate::error::{Result, RjError};

/// Outcome of visiting one directory.
#[derive(Debug)]
pub enum WalkControl {
    /// Keep going, descending into the directory.
    Continue,
    /// Keep going, but don't descend into the directory.
    SkipSubtree,
    /// Stop the walk and return the error.
    Abort(RjError),
}

pub trait Visitor {
    /// Called for every directory reached, the root included.
    fn visit_dir(&mut self, entry: &DirEntry) -> WalkControl;

    /// Called when an entry can't be read. `SkipSubtree` behaves like
    /// `Continue` here since there is nothing to descend into.
    fn walk_error(&mut self, error: walkdir::Error) -> WalkControl;
}

/// Walk `root` depth-first in file-name order, calling `visitor` on each
/// directory. Symlinks are not followed; files are never passed to the
/// visitor.
pub fn walk(root: &Path, visitor: &mut dyn Visitor) -> Result<()> {
    let mut entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(next) = entries.next() {
        let control = match next {
            Ok(entry) if entry.file_type().is_dir() => visitor.visit_dir(&entry),
            Ok(_) => continue,
            Err(err) => visitor.walk_error(err),
        };

        match control {
            WalkControl::Continue => {}
            WalkControl::SkipSubtree => entries.skip_current_dir(),
            WalkControl::Abort(err) => return Err(err),
        }
    }

    Ok(())
}

/// Number of separator-delimited segments in `path` as written.
///
/// `a/.git` has 2, `/proj/a/.git` has 4 (the empty segment before the
/// leading separator counts). Paths below the root are measured after
/// [`clean_path`], so searching `.` visits `a/.git`, not `./a/.git`.
#[must_use]
pub fn path_depth(path: &Path) -> usize {
    path.as_os_str()
        .to_string_lossy()
        .split(std::path::is_separator)
        .count()
}

/// `path` without leading `.` components, as a joined child path reads.
/// A path that is nothing but `.` stays `.`.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .skip_while(|component| matches!(component, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}

// The root keeps the spelling it was given; everything below it is cleaned.
fn walked_path(entry: &DirEntry) -> PathBuf {
    if entry.depth() == 0 {
        entry.path().to_path_buf()
    } else {
        clean_path(entry.path())
    }
}

/// Find every repository reachable from `root` under `config`.
///
/// Entries come back in discovery order. Unreadable directories are
/// reported to `sink`; unreadable repositories are reported or fail the
/// search depending on [`SearchConfig::on_unreadable`].
pub fn search(
    root: &Path,
    config: &SearchConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<DirectoryEntry>> {
    config.validate()?;
    check_root(root)?;

    debug!(
        root = %root.display(),
        depth_limit = config.depth_limit,
        excluded = ?config.excluded_names,
        "starting search"
    );

    let mut collector = RepoCollector {
        config,
        sink,
        entries: Vec::new(),
    };
    walk(root, &mut collector)?;

    debug!(found = collector.entries.len(), "search finished");
    Ok(collector.entries)
}

fn check_root(root: &Path) -> Result<()> {
    let is_dir = std::fs::metadata(root).is_ok_and(|meta| meta.is_dir());
    if !is_dir || std::fs::read_dir(root).is_err() {
        return Err(RjError::RootNotDirectory(root.to_path_buf()));
    }
    Ok(())
}

struct RepoCollector<'a> {
    config: &'a SearchConfig,
    sink: &'a mut dyn DiagnosticSink,
    entries: Vec<DirectoryEntry>,
}

impl RepoCollector<'_> {
    fn read_repository(&mut self, marker: &Path) -> WalkControl {
        match read_branch(marker) {
            Ok(branch) => {
                let path = working_dir(marker);
                debug!(path = %path.display(), %branch, "found repository");
                self.entries.push(DirectoryEntry { path, branch });
                WalkControl::SkipSubtree
            }
            Err(error) => match self.config.on_unreadable {
                UnreadablePolicy::Skip => {
                    self.sink.report(Diagnostic::SkippedRepository {
                        path: working_dir(marker),
                        error,
                    });
                    WalkControl::SkipSubtree
                }
                UnreadablePolicy::Abort => WalkControl::Abort(RjError::Branch {
                    path: marker.to_path_buf(),
                    source: error,
                }),
            },
        }
    }
}

impl Visitor for RepoCollector<'_> {
    fn visit_dir(&mut self, entry: &DirEntry) -> WalkControl {
        let walked = walked_path(entry);
        let path = walked.as_path();

        if path_depth(path) > self.config.depth_limit {
            trace!(path = %path.display(), "depth limit reached");
            return WalkControl::SkipSubtree;
        }

        let name = entry.file_name();
        if self.config.is_excluded(name) {
            trace!(path = %path.display(), "excluded");
            return WalkControl::SkipSubtree;
        }

        if name == MARKER_DIR {
            return self.read_repository(path);
        }

        WalkControl::Continue
    }

    fn walk_error(&mut self, error: walkdir::Error) -> WalkControl {
        self.sink.report(Diagnostic::Walk(error));
        WalkControl::Continue
    }
}

fn working_dir(marker: &Path) -> PathBuf {
    match marker.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
