//! Command-line layer: argument parsing, dispatch, reporting and logging setup.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub mod args;
mod commands;
mod exit_status;
mod report;
mod run;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "POCTL_LOG";

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    init_tracing(verbose);
    let result = run::run(args)?;
    report::print(&result);

    Ok(result.exit_status())
}

/// Install the stderr log subscriber.
///
/// `POCTL_LOG` takes precedence; otherwise only warnings are shown, or debug
/// output for poctl itself with `-v`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "warn,poctl=debug" } else { "warn" })
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
