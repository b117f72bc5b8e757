//! Output for the non-interactive modes.

use console::style;
use serde::Serialize;

use crate::discovery::DirectoryEntry;
use crate::error::{Result, RjError};

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
}

pub fn robot_ok<T: Serialize>(data: T, warnings: Vec<String>) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings,
    }
}

pub fn robot_error(err: &RjError) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
        warnings: Vec::new(),
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| RjError::Config(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// One `path (branch)` line per entry.
#[must_use]
pub fn format_list(entries: &[DirectoryEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} ({})",
                entry.path.display(),
                style(&entry.branch).green()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn emit_list(entries: &[DirectoryEntry]) {
    println!("{}", format_list(entries));
}
