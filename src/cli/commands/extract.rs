use std::path::PathBuf;

use anyhow::Result;

use super::{CommandResult, CommandSummary, helper::load_project_config};
use crate::cli::args::ExtractCommand;
use crate::config::ExtractParams;
use crate::pipeline;

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let config = load_project_config()?;

    let sources = if cmd.from.is_empty() {
        config.sources
    } else {
        cmd.from
    };
    let params = ExtractParams {
        sources,
        output: cmd.to.unwrap_or_else(|| PathBuf::from(config.extract_output)),
        project: config.project.name,
        version: config.project.version,
        rules: config.rules,
    };

    let summary = pipeline::extract(&params)?;
    Ok(CommandResult::new(
        CommandSummary::Extract(summary),
        cmd.common.verbose,
    ))
}
