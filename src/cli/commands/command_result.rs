use crate::cli::args::OutputFormat;
use crate::core::ParseFailure;
use crate::issues::Finding;

#[derive(Debug)]
pub enum CommandSummary {
    Check(CheckSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct CheckSummary {
    pub format: OutputFormat,
    /// Number of source files (TSX/JSX/TS/JS) that were checked.
    pub source_files_checked: usize,
    /// Number of translate declarations found across all files.
    pub declarations: usize,
    pub parse_failures: Vec<ParseFailure>,
}

#[derive(Debug)]
pub struct InitSummary {
    /// False when a config file already existed.
    pub created: bool,
}

/// Result of running keyreach commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// All findings, sorted. Empty for `init`.
    pub findings: Vec<Finding>,
    /// Number of error-severity findings (or refused operations).
    pub error_count: usize,
}
