//! Configuration loading for sheetpipe.
//!
//! Three YAML files drive a run: `sheetpipe_project.yml` (project defaults and
//! object-creation flags), `sheets.yml` (per-sheet column instructions), and
//! `profiles.yml` (destination credentials). [`resolve_job`] combines them
//! with [`RunFlags`] into a [`SheetJob`].

pub mod error;
pub mod flags;
pub mod init;
pub mod profile;
pub mod project;
pub mod resolve;
pub mod sheets;
mod yaml;

pub use error::{ConfigError, Result};
pub use flags::RunFlags;
pub use init::{InitOptions, InitReport, init_project};
pub use profile::{Profile, load_profile};
pub use project::{MAX_SEARCH_DEPTH, PROJECT_FILENAME, Project, find_project_file};
pub use resolve::{
    ColumnPlan, SheetJob, cast_map, lowercase_name_keys, rename_map, resolve_columns, resolve_job,
    resolve_target_schema,
};
pub use sheets::{ExcludedColumns, RawColumn, SHEETS_FILENAME, SheetEntry, load_sheet_entry};
