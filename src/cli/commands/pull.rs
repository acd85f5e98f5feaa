use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary, helper::load_project_config};
use crate::cli::args::PullCommand;
use crate::config::{Credentials, PullParams, ResourceId};
use crate::error::Error;
use crate::pipeline;

pub fn pull(cmd: PullCommand) -> Result<CommandResult> {
    let credentials: Credentials = cmd
        .auth
        .as_deref()
        .ok_or(Error::MissingParameter("auth"))?
        .parse()?;
    let config = load_project_config()?;
    let params = PullParams {
        endpoint: cmd.endpoint.unwrap_or(config.remote.endpoint),
        resource: ResourceId {
            project: cmd.project.unwrap_or(config.remote.project),
            resource: cmd.resource.unwrap_or(config.remote.resource),
        },
        credentials,
        template: cmd
            .template
            .unwrap_or_else(|| PathBuf::from(config.template)),
        dest_dir: cmd.to.unwrap_or_else(|| PathBuf::from(config.i18n_dir)),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let summary = runtime.block_on(pipeline::pull(&params))?;

    Ok(CommandResult::new(
        CommandSummary::Pull(summary),
        cmd.common.verbose,
    ))
}
