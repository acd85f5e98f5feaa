//! Result printing for the CLI.
//!
//! Separate from the pipeline so poctl can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::pipeline::{ExtractSummary, PullSummary, ReformatSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract(summary, writer),
        CommandSummary::Reformat(summary) => print_reformat(summary, result.verbose, writer),
        CommandSummary::Pull(summary) => print_pull(summary, result.verbose, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

fn print_extract<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} {} from {} source {} into {}",
            summary.entries,
            plural(summary.entries, "message", "messages"),
            summary.files_scanned,
            plural(summary.files_scanned, "file", "files"),
            summary.output.display()
        )
        .green()
    );
    if summary.needs_review > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} could not be resolved statically and {} flagged {}",
            "warning:".bold().yellow(),
            summary.needs_review,
            plural(summary.needs_review, "message", "messages"),
            plural(summary.needs_review, "is", "are"),
            "needs-review".cyan()
        );
    }
}

fn print_reformat<W: Write>(summary: &ReformatSummary, verbose: bool, writer: &mut W) {
    if verbose {
        for path in &summary.written {
            let _ = writeln!(writer, "  {} {}", "wrote".dimmed(), path.display());
        }
    }
    let count = summary.written.len();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Reformatted {} {}", count, plural(count, "catalog", "catalogs")).green()
    );
}

fn print_pull<W: Write>(summary: &PullSummary, verbose: bool, writer: &mut W) {
    for outcome in &summary.succeeded {
        if verbose {
            let _ = writeln!(
                writer,
                "  {} {} ({} translated, {} untranslated, {} obsolete)",
                outcome.locale.bold(),
                outcome.path.display(),
                outcome.stats.translated,
                outcome.stats.untranslated,
                outcome.stats.obsolete
            );
        }
    }
    for failure in &summary.failed {
        let _ = writeln!(
            writer,
            "{} {}: {}",
            FAILURE_MARK.red(),
            failure.locale.bold(),
            failure.error
        );
    }

    let succeeded = summary.succeeded.len();
    let message = format!(
        "Pulled {} {}",
        succeeded,
        plural(succeeded, "locale", "locales")
    );
    if summary.is_complete() {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());
    } else {
        let failed = summary.failed.len();
        let _ = writeln!(
            writer,
            "{} {}, {} failed",
            FAILURE_MARK.red(),
            message,
            format!("{} {}", failed, plural(failed, "locale", "locales")).red()
        );
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} already exists",
            FAILURE_MARK.red(),
            CONFIG_FILE_NAME
        );
    }
}
