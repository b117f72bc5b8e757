use std::path::PathBuf;

use tracing::debug;

use crate::cli::output::{emit_json, emit_list, robot_ok};
use crate::cli::{Cli, OutputMode};
use crate::clipboard::{ClipboardSink, SystemClipboard, cd_command};
use crate::config::Config;
use crate::discovery::{
    CollectingSink, DiagnosticSink, DirectoryEntry, LogSink, SearchConfig, search,
};
use crate::error::{Result, RjError};
use crate::picker;

pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub search: SearchConfig,
    pub mode: OutputMode,
    /// Acquired up front so a missing clipboard fails before the walk.
    pub clipboard: Option<SystemClipboard>,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::load(cli.config.as_deref())?;
        config.apply_search_overrides(cli.search_patch());

        let search = config.search_config();
        search.validate()?;

        let mode = cli.output_mode();
        let clipboard = match mode {
            OutputMode::Pick => Some(SystemClipboard::detect(config.clipboard.command.as_deref())?),
            OutputMode::PickAndPrint | OutputMode::List | OutputMode::Robot => None,
        };

        debug!(?search, ?mode, "resolved configuration");

        Ok(Self {
            root: cli.path.clone(),
            config,
            search,
            mode,
            clipboard,
        })
    }

    pub fn find_repositories(&self, sink: &mut dyn DiagnosticSink) -> Result<Vec<DirectoryEntry>> {
        search(&self.root, &self.search, sink)
    }
}

/// Run one invocation end to end.
pub fn run(ctx: &mut AppContext) -> Result<()> {
    match ctx.mode {
        OutputMode::Robot => {
            let mut sink = CollectingSink::new();
            let entries = ctx.find_repositories(&mut sink)?;
            emit_json(&robot_ok(&entries, sink.messages()))
        }
        OutputMode::List => {
            let entries = ctx.find_repositories(&mut LogSink)?;
            if entries.is_empty() {
                return Err(RjError::NoResults);
            }
            emit_list(&entries);
            Ok(())
        }
        OutputMode::PickAndPrint => {
            let entries = ctx.find_repositories(&mut LogSink)?;
            let index = picker::pick(&entries)?;
            println!("{}", cd_command(&entries[index].path));
            Ok(())
        }
        OutputMode::Pick => {
            let entries = ctx.find_repositories(&mut LogSink)?;
            let index = picker::pick(&entries)?;
            let clipboard = ctx
                .clipboard
                .as_mut()
                .ok_or_else(|| RjError::Clipboard("clipboard not initialised".to_string()))?;
            copy_to_clipboard(&entries[index], clipboard)?;
            println!(
                "Command copied to clipboard!: {}",
                entries[index].path.display()
            );
            Ok(())
        }
    }
}

/// Write the `cd` command for `entry` to `clipboard`, returning the command.
pub fn copy_to_clipboard(
    entry: &DirectoryEntry,
    clipboard: &mut dyn ClipboardSink,
) -> Result<String> {
    let command = cd_command(&entry.path);
    clipboard.write_text(&command)?;
    debug!(%command, "copied to clipboard");
    Ok(command)
}
