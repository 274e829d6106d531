//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report unused, undeclared and misused translate() keys
//! - `init`: Initialize keyreach configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::config::OpaqueSeverity;

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
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by analysis commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source code root directory
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Severity of keys only reached through a forwarded object (overrides config file)
    #[arg(long, value_enum)]
    pub opaque_severity: Option<OpaqueSeverity>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Cargo-style human readable report
    #[default]
    Text,
    /// JSON array of findings
    Json,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check translate() declarations for unused, undeclared and misused keys
    Check(CheckCommand),
    /// Initialize a new .keyreachrc.json configuration file
    Init,
}
