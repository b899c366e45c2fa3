use anyhow::{Ok, Result};

use super::super::args::ProcessCommand;
use super::{CommandResult, CommandSummary, RunSummary, helper::finish};
use crate::core::{ProcessContext, RunMode};

pub fn process(cmd: ProcessCommand) -> Result<CommandResult> {
    let ctx = ProcessContext::new(&cmd.common)?;
    let report = ctx.run(RunMode::Process);

    Ok(finish(
        CommandSummary::Process(RunSummary::new(&ctx, report.summaries)),
        report.diagnostics.into_issues(),
    ))
}
