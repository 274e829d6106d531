//! Report formatting and printing utilities.
//!
//! Findings are displayed in cargo-style format, or as a JSON array with
//! `--format json`. Separate from core logic so keyreach can be used as a library.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::args::OutputFormat;
use super::commands::{CheckSummary, CommandResult, CommandSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::ParseFailure;
use crate::issues::{Finding, Report, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) -> Result<()> {
    match &result.summary {
        CommandSummary::Check(summary) => print_check(summary, &result.findings, verbose),
        CommandSummary::Init(summary) => {
            print_init(summary);
            Ok(())
        }
    }
}

fn print_check(summary: &CheckSummary, findings: &[Finding], verbose: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match summary.format {
        OutputFormat::Text => {
            report_to(findings, &mut stdout);
            if findings.is_empty() {
                print_success_to(summary.source_files_checked, &mut stdout);
            }
        }
        OutputFormat::Json => report_json_to(findings, &mut stdout)?,
    }

    let mut stderr = io::stderr().lock();
    if verbose {
        let _ = writeln!(
            stderr,
            "{} {} translate declaration(s) in {} file(s)",
            "note:".bold(),
            summary.declarations,
            summary.source_files_checked
        );
    }
    print_parse_warning_to(&summary.parse_failures, verbose, &mut stderr);
    Ok(())
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
    }
}

/// Print findings in cargo-style format, followed by a summary line.
///
/// Findings are expected to be sorted already.
pub fn report_to<W: Write>(findings: &[Finding], writer: &mut W) {
    if findings.is_empty() {
        return;
    }

    let max_line_width = findings
        .iter()
        .map(|f| f.context().line())
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1);

    for finding in findings {
        print_finding(finding, writer, max_line_width);
    }

    print_summary(findings, writer);
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(source_files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} source {} - no issues found",
            source_files,
            if source_files == 1 { "file" } else { "files" }
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
///
/// With `verbose`, every failure is listed; otherwise only the count.
pub fn print_parse_warning_to<W: Write>(failures: &[ParseFailure], verbose: bool, writer: &mut W) {
    if failures.is_empty() {
        return;
    }
    if verbose {
        for failure in failures {
            let _ = writeln!(
                writer,
                "{} {} - {}",
                "warning:".bold().yellow(),
                failure.file_path,
                failure.error
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            failures.len(),
            "-v".cyan()
        );
    }
}

/// One finding as printed by `--format json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindingRecord<'a> {
    kind: String,
    severity: String,
    key_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    translation_id: Option<&'a str>,
    file: &'a str,
    line: usize,
    column: usize,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

impl<'a> From<&'a Finding> for FindingRecord<'a> {
    fn from(finding: &'a Finding) -> Self {
        let context = finding.context();
        Self {
            kind: finding.kind().to_string(),
            severity: finding.severity().to_string(),
            key_path: finding.key_path(),
            translation_id: finding.translation_id(),
            file: context.file_path(),
            line: context.line(),
            column: context.col(),
            message: finding.message(),
            hint: finding.hint(),
        }
    }
}

/// Print findings as a pretty JSON array.
pub fn report_json_to<W: Write>(findings: &[Finding], writer: &mut W) -> Result<()> {
    let records: Vec<FindingRecord> = findings.iter().map(FindingRecord::from).collect();
    serde_json::to_writer_pretty(&mut *writer, &records).context("Failed to serialize findings")?;
    writeln!(writer).context("Failed to write findings")?;
    Ok(())
}

// ============================================================
// Internal Functions
// ============================================================

fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => text.red(),
        Severity::Warning => text.yellow(),
        Severity::Info => text.cyan(),
    }
}

fn print_finding<W: Write>(finding: &Finding, writer: &mut W, max_line_width: usize) {
    let context = finding.context();
    let severity = finding.severity();

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        paint(&severity.to_string(), severity).bold(),
        finding.message(),
        finding.kind().to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        context.file_path(),
        context.line(),
        context.col()
    );

    if !context.source_line.is_empty() {
        let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = max_line_width);
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            context.line().to_string().blue(),
            "|".blue(),
            context.source_line,
            width = max_line_width
        );

        // col is 1-based
        let prefix: String = context
            .source_line
            .chars()
            .take(context.col().saturating_sub(1))
            .collect();
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            paint("^", severity),
            width = max_line_width,
            padding = UnicodeWidthStr::width(prefix.as_str())
        );
    }

    if let Some(id) = finding.translation_id() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} translation id {}",
            "",
            "=".blue(),
            "note:".bold(),
            id,
            width = max_line_width
        );
    }

    if let Some(hint) = finding.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(findings: &[Finding], writer: &mut W) {
    let count = |severity: Severity| findings.iter().filter(|f| f.severity() == severity).count();
    let (errors, warnings, infos) = (
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Info),
    );

    let mut line = format!(
        "{} {} {} ({} {}, {} {}",
        FAILURE_MARK.red(),
        findings.len(),
        if findings.len() == 1 { "problem" } else { "problems" },
        errors,
        (if errors == 1 { "error" } else { "errors" }).red(),
        warnings,
        (if warnings == 1 { "warning" } else { "warnings" }).yellow()
    );
    if infos > 0 {
        line.push_str(&format!(", {} {}", infos, "info".cyan()));
    }
    line.push(')');

    let _ = writeln!(writer, "{}", line);
}
