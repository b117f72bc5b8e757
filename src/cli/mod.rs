//! Command-line interface.

pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::config::SearchPatch;
use crate::discovery::UnreadablePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "rj",
    author,
    version,
    about = "Display folders and their git branches",
    long_about = "Search PATH for git working directories, show the branch each one has \
                  checked out, and copy a `cd` command for the one you pick to the clipboard."
)]
pub struct Cli {
    /// Directory to search from
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Comma separated list of directory names to exclude from the search
    /// [default: node_modules]
    #[arg(short = 'e', long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Maximum number of path segments a searched directory may have,
    /// ignoring a leading `./` (so `-l 5` from `.` reaches `a/b/c/d`;
    /// absolute paths count from `/`) [default: 5]
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,

    /// What to do with a repository whose branch can't be read
    /// [default: skip]
    #[arg(long, value_enum)]
    pub on_unreadable: Option<UnreadablePolicy>,

    /// Print the repositories found instead of opening the picker
    #[arg(long, conflicts_with = "robot")]
    pub list: bool,

    /// Print the cd command to stdout instead of copying it
    #[arg(long, conflicts_with_all = ["list", "robot"])]
    pub print: bool,

    /// Machine-readable JSON output, no picker
    #[arg(long)]
    pub robot: bool,

    /// Config file to use instead of the global one
    #[arg(long, env = "RJ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long)]
    pub quiet: bool,
}

/// How results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Interactive picker, then clipboard.
    Pick,
    /// Interactive picker, then stdout.
    PickAndPrint,
    List,
    Robot,
}

impl Cli {
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        if self.robot {
            OutputMode::Robot
        } else if self.list {
            OutputMode::List
        } else if self.print {
            OutputMode::PickAndPrint
        } else {
            OutputMode::Pick
        }
    }

    /// Search settings given on the command line.
    #[must_use]
    pub fn search_patch(&self) -> SearchPatch {
        SearchPatch {
            exclude: self.exclude.as_ref().map(|names| {
                names
                    .iter()
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            }),
            depth_limit: self.limit,
            on_unreadable: self.on_unreadable,
        }
    }
}
