//! CLI argument definitions for sheetpipe.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use sheetpipe_config::RunFlags;

#[derive(Parser)]
#[command(
    name = "sheetpipe",
    version,
    about = "Load Google Sheets into a database",
    long_about = "Fetch a Google Sheet, clean and type its columns, and load it into \
                  a Postgres or DuckDB table.\n\n\
                  Sheets are described in sheets.yml; destinations in profiles.yml."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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

    /// Allow sheet cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch one sheet and load it into its target table.
    Upload(UploadArgs),

    /// Create a new project and profile templates.
    Init(InitArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    /// Sheet to load, as named in sheets.yml.
    #[arg(long = "sheet-name", short = 'n', value_name = "NAME")]
    pub sheet_name: Option<String>,

    /// Spreadsheet id; with --schema and --table, replaces sheets.yml.
    #[arg(long = "sheet-key", short = 'k', value_name = "KEY")]
    pub sheet_key: Option<String>,

    /// Target schema (overrides sheets.yml and the project default).
    #[arg(long = "schema", short = 's')]
    pub schema: Option<String>,

    /// Target table (overrides sheets.yml).
    #[arg(long = "table", short = 't')]
    pub table: Option<String>,

    /// Create the table if it does not exist.
    #[arg(long = "create-table")]
    pub create_table: bool,

    /// Create the schema if it does not exist.
    #[arg(long = "create-schema")]
    pub create_schema: bool,

    /// Replace the table instead of appending to it.
    #[arg(long = "destructive-create-table")]
    pub destructive_create_table: bool,

    /// Preview the data and confirm before cleaning and before loading.
    #[arg(long = "interactive", short = 'i')]
    pub interactive: bool,

    /// Preview the cleaned data without loading it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Directory containing sheets.yml.
    #[arg(long = "sheet-config-dir", value_name = "DIR")]
    pub sheet_config_dir: Option<PathBuf>,

    /// Directory containing profiles.yml (default: ~/.sheetpipe).
    #[arg(long = "profile-dir", value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Directory containing sheetpipe_project.yml.
    #[arg(long = "project-dir", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Profile output to use instead of the profile's default target.
    #[arg(long = "target", value_name = "TARGET")]
    pub target: Option<String>,
}

impl UploadArgs {
    pub fn run_flags(&self) -> RunFlags {
        RunFlags {
            sheet_name: self.sheet_name.clone(),
            sheet_key: self.sheet_key.clone(),
            target_schema: self.schema.clone(),
            target_table: self.table.clone(),
            create_table: self.create_table,
            create_schema: self.create_schema,
            destructive_create_table: self.destructive_create_table,
            interactive: self.interactive,
            dry_run: self.dry_run,
            project_dir: self.project_dir.clone(),
            profile_dir: self.profile_dir.clone(),
            sheet_config_dir: self.sheet_config_dir.clone(),
            target: self.target.clone(),
        }
    }
}

#[derive(Args)]
pub struct InitArgs {
    /// Name of the project (and of its directory).
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: String,

    /// Directory in which the project directory is created (default: current directory).
    #[arg(long = "project-dir", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Directory for profiles.yml and Google credentials (default: ~/.sheetpipe).
    #[arg(long = "profile-dir", value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Create missing profile files even when the project already exists.
    #[arg(long = "force-profile")]
    pub force_profile: bool,
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_flags_map_to_run_flags() {
        let cli = Cli::try_parse_from([
            "sheetpipe",
            "upload",
            "--sheet-key",
            "abc",
            "--schema",
            "raw",
            "--table",
            "orders",
            "--create-table",
            "--dry-run",
        ])
        .unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        let flags = args.run_flags();
        assert_eq!(flags.sheet_key.as_deref(), Some("abc"));
        assert_eq!(flags.target_schema.as_deref(), Some("raw"));
        assert_eq!(flags.target_table.as_deref(), Some("orders"));
        assert!(flags.create_table);
        assert!(flags.dry_run);
        assert!(!flags.interactive);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sheetpipe", "init", "demo", "--log-data"]).unwrap();
        assert!(cli.log_data);
        let Command::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(args.project_name, "demo");
    }
}
