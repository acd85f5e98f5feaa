//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Scan sources and write the catalog template
//! - `reformat`: Rewrite catalogs in canonical form
//! - `pull`: Fetch, merge and write every remote locale
//! - `init`: Write a default `.poctlrc.json`
//!
//! Flags override the values found in the configuration file.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Reformat(cmd)) => cmd.common.verbose,
            Some(Command::Pull(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Source files, directories or glob patterns (overrides config file)
    #[arg(long = "from", value_name = "PATH", num_args = 1..)]
    pub from: Vec<String>,

    /// Template file to write (overrides config file)
    #[arg(long, value_name = "FILE")]
    pub to: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ReformatCommand {
    /// Catalog files to rewrite
    #[arg(long = "from", value_name = "FILE", num_args = 1..)]
    pub from: Vec<PathBuf>,

    /// Output file, or directory receiving one file per input (overrides config file)
    #[arg(long, value_name = "PATH")]
    pub to: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct PullCommand {
    /// Credentials as `user:secret`
    #[arg(long, env = "POCTL_AUTH", hide_env_values = true)]
    pub auth: Option<String>,

    /// Directory receiving one catalog per locale (overrides config file)
    #[arg(long, value_name = "DIR")]
    pub to: Option<PathBuf>,

    /// Local template merged with each remote catalog (overrides config file)
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Remote project slug (overrides config file)
    #[arg(long)]
    pub project: Option<String>,

    /// Remote resource slug (overrides config file)
    #[arg(long)]
    pub resource: Option<String>,

    /// API base URL (overrides config file)
    #[arg(long)]
    pub endpoint: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan source files for translatable messages and write the template
    Extract(ExtractCommand),
    /// Parse catalog files and write them back in canonical form
    Reformat(ReformatCommand),
    /// Fetch every locale of the remote resource and merge it with the template
    Pull(PullCommand),
    /// Initialize a new .poctlrc.json configuration file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn test_parse_pull_flags() {
        let args = Arguments::try_parse_from([
            "poctl",
            "pull",
            "--auth",
            "alice:secret",
            "--to",
            "out",
            "-v",
        ])
        .unwrap();
        assert!(args.verbose());
        let Some(Command::Pull(cmd)) = args.command else {
            panic!("expected pull");
        };
        assert_eq!(cmd.auth.as_deref(), Some("alice:secret"));
        assert_eq!(cmd.to, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_parse_multiple_sources() {
        let args =
            Arguments::try_parse_from(["poctl", "extract", "--from", "a.js", "lib"]).unwrap();
        let Some(Command::Extract(cmd)) = args.command else {
            panic!("expected extract");
        };
        assert_eq!(cmd.from, vec!["a.js", "lib"]);
        assert!(!cmd.common.verbose);
    }
}
