//! Language database editor CLI.

use clap::{ColorChoice, Parser};
use ldb_cli::logging::{LogConfig, LogFormat, init_logging};
use ldb_store::{DatabaseError, EditorConfig};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;
use tracing::warn;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    Session, run_add_pos, run_add_user, run_classify, run_find, run_ignore, run_import,
    run_info, run_init, run_next, run_reject,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config = match EditorConfig::load(&cli.config) {
        Ok(config) => config,
        Err(error) => {
            report_error(&anyhow::Error::new(error));
            std::process::exit(1);
        }
    };
    let mut session = Session {
        config: config.clone(),
        strict: cli.strict,
    };

    let result = match &cli.command {
        Command::Init(args) => run_init(&mut session, args),
        Command::Info(args) => run_info(&mut session, args),
        Command::Find(args) => run_find(&mut session, args),
        Command::Import(args) => run_import(&mut session, args),
        Command::AddUser(args) => run_add_user(&mut session, args),
        Command::AddPos(args) => run_add_pos(&mut session, args),
        Command::Classify(args) => run_classify(&mut session, args),
        Command::Ignore(args) => run_ignore(&mut session, args),
        Command::Reject(args) => run_reject(&mut session, args),
        Command::Next(args) => run_next(&mut session, args),
    };

    if session.config != config
        && let Err(error) = session.config.save(&cli.config)
    {
        warn!(path = %cli.config.display(), %error, "could not save configuration");
    }

    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) {
    eprintln!("error: {error:#}");
    let hint = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<DatabaseError>())
        .and_then(DatabaseError::suggestion);
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
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
