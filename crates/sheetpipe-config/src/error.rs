use std::path::PathBuf;

use sheetpipe_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error(
        "unable to find {file} in {start} or its parents (searched {max_depth} directories)"
    )]
    ProjectFileNotFound {
        file: &'static str,
        start: PathBuf,
        max_depth: usize,
    },
    #[error(
        "cannot find sheets.yml in {0}; pass --sheet-config-dir or run from a project folder"
    )]
    SheetConfigMissing(PathBuf),
    #[error("no configuration was found for sheet '{0}'; check your sheets.yml file")]
    SheetNotFound(String),
    #[error("found {count} configurations for sheet '{name}'; check your sheets.yml file")]
    DuplicateSheet { name: String, count: usize },
    #[error(
        "no sheet selected: pass --sheet-name, or --sheet-key together with --schema and --table"
    )]
    MissingSheetSelection,
    #[error(
        "no target schema found for table '{table}'; provide one on the command line, in sheets.yml, or in the project"
    )]
    TargetSchemaMissing { table: String },
    #[error("no target table configured for sheet '{0}'")]
    TargetTableMissing(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("could not find profile '{profile}' in {path}")]
    ProfileNotFound { profile: String, path: PathBuf },
    #[error("could not find target '{target}' under profile '{profile}'")]
    ProfileTargetNotFound { profile: String, target: String },
    #[error("the following profile fields cannot be empty: {}", .0.join(", "))]
    InvalidProfile(Vec<String>),
    #[error("a sheetpipe project already exists at {0}")]
    ProjectExists(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
