//! rj - jump between git working directories.
//!
//! Walks a directory tree for `.git` directories, reads the branch each one
//! has checked out, and lets the user pick one to `cd` into.

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod discovery;
pub mod error;
pub mod picker;
pub mod test_utils;

pub use error::{Result, RjError};
