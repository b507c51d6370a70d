use std::path::PathBuf;

/// Per-run options, usually parsed from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub sheet_name: Option<String>,
    pub sheet_key: Option<String>,
    pub target_schema: Option<String>,
    pub target_table: Option<String>,
    pub create_table: bool,
    pub create_schema: bool,
    pub destructive_create_table: bool,
    pub interactive: bool,
    pub dry_run: bool,
    pub project_dir: Option<PathBuf>,
    pub profile_dir: Option<PathBuf>,
    pub sheet_config_dir: Option<PathBuf>,
    pub target: Option<String>,
}
