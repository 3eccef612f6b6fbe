//! `nutri` command-line entry point.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};

use nutri_cli::logging::{LogConfig, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_energy, run_pipeline, run_report, run_search, run_sources};
use crate::summary::print_run_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Run(args) => run_pipeline(args).map(|outcome| {
            print_run_summary(&outcome);
            !outcome.has_errors()
        }),
        Command::Report(args) => run_report(args).map(|()| true),
        Command::Search(args) => run_search(args).map(|()| true),
        Command::Energy(args) => run_energy(args).map(|()| true),
        Command::Sources(args) => run_sources(args).map(|()| true),
    };
    let exit_code = match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Logging configuration from CLI flags: `--log-level` beats `-v/-q`, which
/// beat `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), Into::into),
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        log_data: cli.log_data,
        with_ansi,
        ..LogConfig::default()
    }
}
