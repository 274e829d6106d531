use anyhow::Result;

use super::{CheckSummary, CommandResult, CommandSummary, helper::finish};
use crate::cli::args::CheckCommand;
use crate::core::CheckContext;

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = CheckContext::new(&cmd.common)?;
    let outcome = ctx.analyze();

    let summary = CommandSummary::Check(CheckSummary {
        format: cmd.format,
        source_files_checked: outcome.files_checked,
        declarations: outcome.declarations,
        parse_failures: outcome.parse_failures,
    });

    Ok(finish(summary, outcome.findings))
}
