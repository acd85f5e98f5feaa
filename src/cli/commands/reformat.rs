use std::path::PathBuf;

use anyhow::Result;

use super::{CommandResult, CommandSummary, helper::load_project_config};
use crate::cli::args::ReformatCommand;
use crate::config::ReformatParams;
use crate::pipeline;

pub fn reformat(cmd: ReformatCommand) -> Result<CommandResult> {
    let config = load_project_config()?;

    let params = ReformatParams {
        inputs: cmd.from,
        output: cmd.to.unwrap_or_else(|| PathBuf::from(config.i18n_dir)),
    };

    let summary = pipeline::reformat(&params)?;
    Ok(CommandResult::new(
        CommandSummary::Reformat(summary),
        cmd.common.verbose,
    ))
}
