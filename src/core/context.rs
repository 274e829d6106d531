use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        analyze::{AnalysisOptions, FileAnalysis, analyze_module},
        file_scanner::{ScanOptions, scan_files},
        parsers::jsx::parse_jsx_source,
    },
    issues::{Finding, Report},
};

/// A source file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub file_path: String,
    pub error: String,
}

/// Result of analyzing every scanned file.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    /// Sorted by file, line, column and kind.
    pub findings: Vec<Finding>,
    pub parse_failures: Vec<ParseFailure>,
    pub files_checked: usize,
    pub declarations: usize,
}

/// Analysis context of one `keyreach check` run.
///
/// Configuration is merged with the following priority (highest to lowest):
/// 1. CLI arguments (e.g. `--opaque-severity warning`)
/// 2. `.keyreachrc.json` config file
/// 3. Built-in defaults
pub struct CheckContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory.
    pub root_dir: PathBuf,

    /// All source files to analyze (TSX/JSX/TS/JS), in path order.
    pub files: BTreeSet<String>,

    pub verbose: bool,
}

impl CheckContext {
    /// Load configuration and scan source files.
    ///
    /// # Errors
    ///
    /// Returns error if the source root is not valid UTF-8 or the config file
    /// cannot be read, parsed or validated.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;

        let root_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = root_dir
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let config_result = load_config(Path::new(path))?;
        if verbose && !config_result.from_file {
            eprintln!(
                "{} No {} found, using default configuration",
                "note:".bold(),
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(severity) = common_args.opaque_severity {
            config.opaque_reach_severity = severity;
        }

        let scan_result = scan_files(
            path,
            &ScanOptions {
                includes: &config.includes,
                ignores: &config.ignores,
                ignore_test_files: config.ignore_test_files,
            },
        );

        if !scan_result.skipped.is_empty() {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped.len(),
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose,
        })
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            translate_functions: self.config.translate_functions.clone(),
            opaque_severity: self.config.opaque_reach_severity.severity(),
        }
    }

    /// Read, parse and analyze every file in parallel.
    ///
    /// Each file gets its own `SourceMap`; no state is shared between workers.
    pub fn analyze(&self) -> CheckOutcome {
        let options = self.analysis_options();

        let results: Vec<(&String, Result<FileAnalysis>)> = self
            .files
            .par_iter()
            .map(|file_path| (file_path, analyze_file(file_path, &options)))
            .collect();

        let mut outcome = CheckOutcome {
            files_checked: self.files.len(),
            ..Default::default()
        };
        for (file_path, result) in results {
            match result {
                Ok(analysis) => {
                    outcome.declarations += analysis.declarations;
                    outcome.findings.extend(analysis.findings);
                }
                Err(e) => {
                    debug!(file = %file_path, error = %e, "skipping file");
                    outcome.parse_failures.push(ParseFailure {
                        file_path: file_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        sort_findings(&mut outcome.findings);
        debug!(
            files = outcome.files_checked,
            declarations = outcome.declarations,
            findings = outcome.findings.len(),
            "check finished"
        );
        outcome
    }
}

fn analyze_file(file_path: &str, options: &AnalysisOptions) -> Result<FileAnalysis> {
    let code = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path))?;
    let source_map = Arc::new(swc_common::SourceMap::default());
    let parsed = parse_jsx_source(code, file_path, source_map)?;
    Ok(analyze_module(&parsed, file_path, options))
}

/// Stable sort by location then kind; findings at the same spot keep pipeline order.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        a.context()
            .location
            .cmp(&b.context().location)
            .then_with(|| a.kind().cmp(&b.kind()))
    });
}
