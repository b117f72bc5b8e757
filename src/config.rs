//! Layered configuration.
//!
//! Defaults, then the global `config.toml` (or an explicit file instead of
//! it), then `RJ_*` environment variables, then command-line flags. Each
//! layer is a patch whose set fields replace the current values.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::{DEFAULT_DEPTH_LIMIT, DEFAULT_EXCLUDE, SearchConfig, UnreadablePolicy};
use crate::error::{Result, RjError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let patch = match explicit_path {
            Some(path) => Self::load_patch(path)?,
            None => Self::load_global()?,
        };
        if let Some(patch) = patch {
            config.merge_patch(patch);
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Location of the global config file, if the platform has a config dir.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rj").join("config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| RjError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| RjError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.clipboard {
            self.clipboard.merge(patch);
        }
    }

    /// Apply `RJ_*` overrides, looking variables up through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let mut search = SearchPatch::default();
        if let Some(value) = lookup("RJ_EXCLUDE") {
            search.exclude = Some(split_list(&value));
        }
        if let Some(value) = lookup("RJ_DEPTH_LIMIT") {
            search.depth_limit = Some(value.trim().parse::<usize>().map_err(|err| {
                RjError::Config(format!("invalid RJ_DEPTH_LIMIT value {value}: {err}"))
            })?);
        }
        if let Some(value) = lookup("RJ_ON_UNREADABLE") {
            search.on_unreadable = Some(value.parse()?);
        }
        self.search.merge(search);

        if let Some(value) = lookup("RJ_CLIPBOARD_COMMAND") {
            self.clipboard.command = Some(value);
        }

        Ok(())
    }

    /// Apply the search-related command-line flags.
    pub fn apply_search_overrides(&mut self, patch: SearchPatch) {
        self.search.merge(patch);
    }

    /// Build the traversal policy.
    #[must_use]
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            excluded_names: self.search.exclude.iter().cloned().collect::<HashSet<_>>(),
            depth_limit: self.search.depth_limit,
            on_unreadable: self.search.on_unreadable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    /// Directory names never inspected or descended into.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Maximum path segments of a visited directory, not counting leading
    /// `.` components. Relative to the working directory when searching
    /// `.`, counted from `/` when searching an absolute path.
    #[serde(default = "default_depth_limit")]
    pub depth_limit: usize,
    #[serde(default)]
    pub on_unreadable: UnreadablePolicy,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

impl SearchSection {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(values) = patch.exclude {
            self.exclude = dedup(values);
        }
        if let Some(value) = patch.depth_limit {
            self.depth_limit = value;
        }
        if let Some(value) = patch.on_unreadable {
            self.on_unreadable = value;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Command that reads the clipboard text on stdin, e.g.
    /// `"xclip -selection clipboard"`. Auto-detected when unset.
    #[serde(default)]
    pub command: Option<String>,
}

impl ClipboardConfig {
    fn merge(&mut self, patch: ClipboardPatch) {
        if let Some(value) = patch.command {
            self.command = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub clipboard: Option<ClipboardPatch>,
}

/// Partial search settings from one configuration layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPatch {
    pub exclude: Option<Vec<String>>,
    pub depth_limit: Option<usize>,
    pub on_unreadable: Option<UnreadablePolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ClipboardPatch {
    pub command: Option<String>,
}

fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDE.iter().map(|name| (*name).to_string()).collect()
}

const fn default_depth_limit() -> usize {
    DEFAULT_DEPTH_LIMIT
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Split a comma separated list, dropping blanks.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
