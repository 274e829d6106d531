use super::{CommandResult, CommandSummary};
use crate::core::context::sort_findings;
use crate::issues::{Finding, Report, Severity};

pub fn finish(summary: CommandSummary, mut findings: Vec<Finding>) -> CommandResult {
    sort_findings(&mut findings);

    let mut error_count = findings
        .iter()
        .filter(|f| f.severity() == Severity::Error)
        .count();

    if let CommandSummary::Init(ref summary) = summary
        && !summary.created
    {
        error_count += 1;
    }

    CommandResult {
        summary,
        findings,
        error_count,
    }
}
