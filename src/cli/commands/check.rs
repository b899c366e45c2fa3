use anyhow::{Ok, Result};

use super::super::args::CheckCommand;
use super::{CommandResult, CommandSummary, RunSummary, helper::finish};
use crate::core::{ProcessContext, RunMode};

/// Resolve every referenced resource without reading or writing any store.
pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let ctx = ProcessContext::new(&cmd.common)?;
    let report = ctx.run(RunMode::Check);

    Ok(finish(
        CommandSummary::Check(RunSummary::new(&ctx, report.summaries)),
        report.diagnostics.into_issues(),
    ))
}
