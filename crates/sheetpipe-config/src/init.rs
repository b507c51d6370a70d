//! Project scaffolding for `sheetpipe init`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::profile::PROFILES_FILENAME;
use crate::project::{PROJECT_FILENAME, default_profile_dir};
use crate::sheets::SHEETS_FILENAME;

const PROJECT_TEMPLATE: &str = "\
name: '{name}'

# default destination schema
target_schema: 'sandbox'

always_create_table: true
";

const SHEETS_TEMPLATE: &str = "\
sheets:
  # - sheet_name: my_sheet
  #   sheet_key: <spreadsheet id>
  #   target_table: my_table
  #   columns:
  #     - name: col_a
  #       datatype: varchar
  []
";

const PROFILES_TEMPLATE: &str = "\
profiles:
  {name}:
    target: dev
    outputs:
      dev:
        db_type: duckdb
        path: '{name}.duckdb'
        schema: sandbox
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    pub project_name: String,
    /// Directory in which the project folder is created.
    pub project_parent: PathBuf,
    pub profile_dir: Option<PathBuf>,
    /// Only create profile and credential files when the project already exists.
    pub force_profile: bool,
}

/// Paths written (or left untouched) by [`init_project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub project_dir: PathBuf,
    pub project_created: bool,
    pub profiles_file: PathBuf,
    pub google_credentials: PathBuf,
}

pub fn init_project(options: &InitOptions) -> Result<InitReport> {
    let project_dir = options.project_parent.join(&options.project_name);
    let project_created = if project_dir.exists() {
        if !options.force_profile {
            return Err(ConfigError::ProjectExists(project_dir));
        }
        warn!(
            project = %options.project_name,
            "project already exists, only creating profile files"
        );
        false
    } else {
        create_dir(&project_dir)?;
        let project = PROJECT_TEMPLATE.replace("{name}", &options.project_name);
        create_file(&project_dir.join(PROJECT_FILENAME), &project)?;
        create_file(&project_dir.join(SHEETS_FILENAME), SHEETS_TEMPLATE)?;
        true
    };

    let profile_dir = options
        .profile_dir
        .clone()
        .unwrap_or_else(default_profile_dir);
    create_dir(&profile_dir)?;
    let profiles_file = profile_dir.join(PROFILES_FILENAME);
    create_file(
        &profiles_file,
        &PROFILES_TEMPLATE.replace("{name}", &options.project_name),
    )?;
    let google_dir = profile_dir.join("google");
    create_dir(&google_dir)?;
    let google_credentials = google_dir.join(format!("{}.json", options.project_name));
    create_file(&google_credentials, "{}\n")?;

    info!(project_dir = %project_dir.display(), "project initialised");
    Ok(InitReport {
        project_dir,
        project_created,
        profiles_file,
        google_credentials,
    })
}

fn create_dir(path: &Path) -> Result<()> {
    if path.exists() {
        debug!(path = %path.display(), "directory already exists");
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `contents` unless the file is already there.
fn create_file(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        debug!(path = %path.display(), "file already exists");
        return Ok(());
    }
    fs::write(path, contents).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
