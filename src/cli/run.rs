use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, extract::extract, init::init, pull::pull, reformat::reformat,
    },
};

/// Dispatch to the handler of the parsed command.
///
/// # Returns
/// - `Ok(CommandResult)` with the operation summary
/// - `Err` if the operation aborted (missing parameter, rejected credentials,
///   unreadable input, ...)
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Reformat(cmd)) => reformat(cmd),
        Some(Command::Pull(cmd)) => pull(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
