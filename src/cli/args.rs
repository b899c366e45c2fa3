//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `process`: Resolve referenced SQL files and merge them into the named-query properties
//! - `check`: Report missing or unreadable SQL files without writing anything
//! - `init`: Initialize a namedsql configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::QueryFlavor;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Process(cmd)) => cmd.common.verbose,
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `process` and `check`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root; config lookup starts here (default: current directory)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Directory the properties files are written to (overrides config file)
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Directory searched for SQL files (overrides config file)
    /// Can be specified multiple times: --resource-root a --resource-root b
    #[arg(long)]
    pub resource_root: Vec<PathBuf>,

    /// JSON declaration manifest to read instead of scanning Java sources
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Annotation flavors to process (default: all)
    #[arg(long, value_enum)]
    pub flavor: Vec<QueryFlavor>,

    /// Suffix marking a value as a SQL file reference (overrides config file)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ProcessCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve referenced SQL files and merge them into the named-query properties files
    Process(ProcessCommand),
    /// Report missing or unreadable SQL files without touching the properties files
    Check(CheckCommand),
    /// Initialize a new .namedsqlrc.json configuration file
    Init,
}
