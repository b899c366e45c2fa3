use crate::{
    cli::exit_status::ExitStatus,
    core::{FlavorSummary, ProcessContext},
    issues::Issue,
};

#[derive(Debug)]
pub enum CommandSummary {
    Process(RunSummary),
    Check(RunSummary),
    Init(InitSummary),
}

/// Per-flavor results of a `process` or `check` run.
#[derive(Debug)]
pub struct RunSummary {
    pub flavors: Vec<FlavorSummary>,
    /// Java files scanned; 0 when declarations came from a manifest.
    pub source_files: usize,
    pub from_manifest: bool,
}

impl RunSummary {
    pub fn new(ctx: &ProcessContext, flavors: Vec<FlavorSummary>) -> Self {
        Self {
            flavors,
            source_files: ctx.source_files,
            from_manifest: ctx.config.manifest.is_some(),
        }
    }

    /// Declarations across all flavors.
    pub fn declaration_count(&self) -> usize {
        self.flavors.iter().map(|f| f.declaration_count).sum()
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running a namedsql command
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    /// All issues recorded during the run, sorted for display.
    pub issues: Vec<Issue>,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::from_error_count(self.error_count)
    }
}
