//! CLI argument definitions for the language database editor.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ldb_store::{CONFIG_FILE_NAME, Section};

#[derive(Parser)]
#[command(
    name = "langdb",
    version,
    about = "Language database editor - collect and classify the words of a language",
    long_about = "Maintain an XML language database of surface forms, roots and parts of speech.\n\n\
                  Import word lists, then classify each surface form against a root."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Editor configuration file.
    #[arg(long = "config", value_name = "PATH", default_value = CONFIG_FILE_NAME, global = true)]
    pub config: PathBuf,

    /// Refuse databases with missing sections instead of repairing them.
    #[arg(long = "strict", global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new, empty language database.
    Init(InitArgs),

    /// Show a summary of a database (defaults to the last one used).
    Info(DatabaseArg),

    /// Search records by id or field values.
    Find(FindArgs),

    /// Import a word list as new surface forms.
    Import(ImportArgs),

    /// Add an annotator.
    AddUser(AddUserArgs),

    /// Add a part of speech.
    AddPos(AddPosArgs),

    /// Attach a surface form to a root and mark it classified.
    Classify(ClassifyArgs),

    /// Mark a surface form as ignored.
    Ignore(SurfaceFormArgs),

    /// Mark a surface form as rejected.
    Reject(SurfaceFormArgs),

    /// Show the next surface form waiting for classification.
    Next(DatabaseArg),
}

#[derive(Args)]
pub struct DatabaseArg {
    /// Language database file; the last one used when omitted.
    #[arg(value_name = "DB")]
    pub database: Option<PathBuf>,
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    /// Language code stored in the database.
    #[arg(long = "lang", value_name = "CODE")]
    pub lang: String,

    /// Overwrite an existing file.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Args)]
pub struct FindArgs {
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    /// Match records with this id.
    #[arg(long = "id", value_name = "N")]
    pub id: Option<u32>,

    /// Only search this section (all sections when omitted).
    #[arg(long = "section", value_name = "SECTION")]
    pub section: Option<Section>,

    /// Field condition, repeatable.
    #[arg(long = "where", value_name = "FIELD=VALUE", value_parser = parse_condition)]
    pub conditions: Vec<(String, String)>,

    /// Require every condition instead of any.
    #[arg(long = "all")]
    pub all: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    /// Word list, one word per line.
    #[arg(value_name = "WORDLIST")]
    pub word_list: PathBuf,

    /// Source name (default: the word list's file name).
    #[arg(long = "name")]
    pub name: Option<String>,

    #[arg(long = "description")]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct AddUserArgs {
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Args)]
pub struct AddPosArgs {
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(long = "shortcut")]
    pub shortcut: Option<String>,

    #[arg(long = "remarks")]
    pub remarks: Option<String>,
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    #[arg(value_name = "SURFACE_FORM_ID")]
    pub surface_form: u32,

    /// Root value; found or created.
    #[arg(value_name = "ROOT")]
    pub root: String,

    /// Part of speech of the root, by name or shortcut.
    #[arg(long = "pos", value_name = "NAME")]
    pub pos: Option<String>,
}

#[derive(Args)]
pub struct SurfaceFormArgs {
    #[arg(value_name = "DB")]
    pub database: PathBuf,

    #[arg(value_name = "ID")]
    pub surface_form: u32,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_condition(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_find_conditions() {
        let cli = Cli::try_parse_from([
            "langdb",
            "find",
            "af.xldb",
            "--section",
            "surface_forms",
            "--where",
            "status=todo",
            "--where",
            "value=huis",
            "--all",
        ])
        .unwrap();
        let Command::Find(args) = cli.command else {
            panic!("expected find");
        };
        assert_eq!(args.section, Some(Section::SurfaceForms));
        assert_eq!(
            args.conditions,
            vec![
                ("status".to_string(), "todo".to_string()),
                ("value".to_string(), "huis".to_string())
            ]
        );
        assert!(args.all);
    }

    #[test]
    fn rejects_condition_without_field() {
        assert!(parse_condition("=todo").is_err());
        assert!(parse_condition("todo").is_err());
        assert_eq!(
            parse_condition("remarks=").unwrap(),
            ("remarks".to_string(), String::new())
        );
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["langdb", "next", "--strict", "--config", "cfg.json"]).unwrap();
        assert!(cli.strict);
        assert_eq!(cli.config, PathBuf::from("cfg.json"));
        assert!(matches!(cli.command, Command::Next(DatabaseArg { database: None })));
    }
}
