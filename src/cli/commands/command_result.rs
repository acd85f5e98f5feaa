use crate::pipeline::{ExtractSummary, PullSummary, ReformatSummary};

use super::super::exit_status::ExitStatus;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Reformat(ReformatSummary),
    Pull(PullSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running a poctl command.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Print one line per written file instead of totals only.
    pub verbose: bool,
}

impl CommandResult {
    pub fn new(summary: CommandSummary, verbose: bool) -> Self {
        Self { summary, verbose }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Pull(summary) if !summary.is_complete() => ExitStatus::Failure,
            CommandSummary::Init(InitSummary { created: false }) => ExitStatus::Failure,
            _ => ExitStatus::Success,
        }
    }
}
