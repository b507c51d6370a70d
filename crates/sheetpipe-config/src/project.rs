//! `sheetpipe_project.yml` discovery and parsing.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sheetpipe_model::CreationPolicy;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::flags::RunFlags;
use crate::yaml::{from_value, read_value};

pub const PROJECT_FILENAME: &str = "sheetpipe_project.yml";
/// Number of directories inspected when looking for the project file.
pub const MAX_SEARCH_DEPTH: usize = 4;

const DEFAULT_PROFILE_DIR: &str = ".sheetpipe";

#[derive(Debug, Default, Deserialize)]
struct ProjectFile {
    name: String,
    #[serde(default)]
    target_schema: Option<String>,
    #[serde(default)]
    always_create_table: bool,
    #[serde(default)]
    always_create_schema: bool,
    #[serde(default)]
    always_create_objects: bool,
    /// Deprecated alias of `always_create_table`.
    #[serde(default)]
    always_create: bool,
    #[serde(default)]
    destructive_create_table: bool,
    #[serde(default)]
    paths: ProjectPaths,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectPaths {
    profile_dir: Option<PathBuf>,
    sheet_config_dir: Option<PathBuf>,
}

/// Loaded project with flag overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub project_dir: PathBuf,
    pub target_schema: Option<String>,
    pub profile_dir: PathBuf,
    pub sheet_config_dir: PathBuf,
    pub creation: CreationPolicy,
}

impl Project {
    /// Locate and load the project file, then apply `flags`.
    ///
    /// With `flags.project_dir` set the file must live in that directory;
    /// otherwise it is searched for from `cwd` upwards.
    pub fn load(flags: &RunFlags, cwd: &Path) -> Result<Self> {
        let path = match &flags.project_dir {
            Some(dir) => dir.join(PROJECT_FILENAME),
            None => find_project_file(cwd, MAX_SEARCH_DEPTH)?,
        };
        let project_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        let file: ProjectFile = from_value(&path, read_value(&path)?)?;
        debug!(project = %file.name, path = %path.display(), "loaded project file");

        if file.always_create {
            warn!(
                "'always_create' is deprecated and now means 'always_create_table'; \
                 use 'always_create_table' or 'always_create_objects' instead"
            );
        }

        let profile_dir = flags
            .profile_dir
            .clone()
            .or_else(|| {
                file.paths
                    .profile_dir
                    .as_deref()
                    .map(|dir| project_dir.join(expand_home(dir)))
            })
            .unwrap_or_else(default_profile_dir);
        let sheet_config_dir = flags
            .sheet_config_dir
            .clone()
            .or_else(|| {
                file.paths
                    .sheet_config_dir
                    .as_deref()
                    .map(|dir| project_dir.join(expand_home(dir)))
            })
            .unwrap_or_else(|| project_dir.clone());

        let creation = creation_policy(&file, flags);
        debug!(?creation, "object creation policy");
        Ok(Self {
            name: file.name,
            project_dir,
            target_schema: file.target_schema.filter(|schema| !schema.is_empty()),
            profile_dir,
            sheet_config_dir,
            creation,
        })
    }
}

fn creation_policy(file: &ProjectFile, flags: &RunFlags) -> CreationPolicy {
    let everything = file.always_create_objects;
    CreationPolicy {
        create_table: everything
            || file.always_create_table
            || file.always_create
            || flags.create_table,
        create_schema: everything || file.always_create_schema || flags.create_schema,
        destructive_create_table: file.destructive_create_table || flags.destructive_create_table,
    }
}

/// Walk up from `start` looking for [`PROJECT_FILENAME`].
pub fn find_project_file(start: &Path, max_depth: usize) -> Result<PathBuf> {
    let mut current = Some(start);
    for _ in 0..max_depth {
        let Some(dir) = current else {
            break;
        };
        let candidate = dir.join(PROJECT_FILENAME);
        debug!(path = %candidate.display(), "looking for project file");
        if candidate.is_file() {
            return Ok(candidate);
        }
        current = dir.parent();
    }
    Err(ConfigError::ProjectFileNotFound {
        file: PROJECT_FILENAME,
        start: start.to_path_buf(),
        max_depth,
    })
}

pub(crate) fn default_profile_dir() -> PathBuf {
    home_dir()
        .map(|home| home.join(DEFAULT_PROFILE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_DIR))
}

pub(crate) fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
