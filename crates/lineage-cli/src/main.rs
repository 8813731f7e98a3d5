//! Lineage rule generator CLI.

use clap::{ColorChoice, Parser};
use lineage_cli::config::RunConfig;
use lineage_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_generate, run_legacies};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    // The config file can set the log level, so it is read before logging starts.
    let run_config = match &cli.command {
        Command::Generate(args) => match RunConfig::load(args.config.as_deref()) {
            Ok(config) => Some(config),
            Err(error) => {
                eprintln!("error: {error:#}");
                std::process::exit(1);
            }
        },
        Command::Legacies => None,
    };
    let config_level = run_config
        .as_ref()
        .and_then(|config| config.logging.level_filter());
    if let Err(error) = init_logging(&log_config_from_cli(&cli, config_level)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Generate(args) => match run_generate(&args, run_config.unwrap_or_default()) {
            Ok(report) => {
                print_summary(&report);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Legacies => match run_legacies() {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Resolve the log level: `--log-level`, then `-v`/`-q`, then the config file.
fn log_config_from_cli(cli: &Cli, config_level: Option<LevelFilter>) -> LogConfig {
    let flag_level = cli.log_level.map(|level| match level {
        LogLevelArg::Error => LevelFilter::ERROR,
        LogLevelArg::Warn => LevelFilter::WARN,
        LogLevelArg::Info => LevelFilter::INFO,
        LogLevelArg::Debug => LevelFilter::DEBUG,
        LogLevelArg::Trace => LevelFilter::TRACE,
    });
    let verbosity_level = cli
        .verbosity
        .is_present()
        .then(|| cli.verbosity.tracing_level_filter());
    let mut config = LogConfig {
        level_filter: flag_level
            .or(verbosity_level)
            .or(config_level)
            .unwrap_or(LevelFilter::WARN),
        use_env_filter: flag_level.is_none() && verbosity_level.is_none(),
        ..LogConfig::default()
    };
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
