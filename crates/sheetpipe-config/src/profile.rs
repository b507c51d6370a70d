//! `profiles.yml` parsing.
//!
//! ```yaml
//! profiles:
//!   my_project:
//!     target: dev
//!     outputs:
//!       dev:
//!         db_type: postgres
//!         host: localhost
//!         port: 5432
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::yaml::{read_value, scalar_to_string};

pub const PROFILES_FILENAME: &str = "profiles.yml";
const REQUIRED_NON_EMPTY: &[&str] = &["db_type"];

/// One output of a project profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub project: String,
    pub target: String,
    pub db_type: String,
    /// Every scalar field of the output, `db_type` included, rendered as text.
    pub fields: BTreeMap<String, String>,
    pub profile_dir: PathBuf,
}

impl Profile {
    /// Location of the Google credentials for this project.
    pub fn google_credentials_path(&self) -> PathBuf {
        self.profile_dir
            .join("google")
            .join(format!("{}.json", self.project))
    }
}

/// Load the output selected by `target`, or the profile's default target.
pub fn load_profile(profile_dir: &Path, project: &str, target: Option<&str>) -> Result<Profile> {
    let path = profile_dir.join(PROFILES_FILENAME);
    if !path.is_file() {
        return Err(ConfigError::Io {
            path,
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    let document = read_value(&path)?;
    let profile = document
        .get("profiles")
        .and_then(|profiles| profiles.get(project))
        .ok_or_else(|| ConfigError::ProfileNotFound {
            profile: project.to_string(),
            path: path.clone(),
        })?;
    let target = match target {
        Some(target) => target.to_string(),
        None => profile
            .get("target")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    };
    let output = profile
        .get("outputs")
        .and_then(|outputs| outputs.get(target.as_str()))
        .and_then(Value::as_mapping)
        .ok_or_else(|| ConfigError::ProfileTargetNotFound {
            profile: project.to_string(),
            target: target.clone(),
        })?;

    let mut fields = BTreeMap::new();
    for (key, value) in output {
        let (Some(key), Some(value)) = (key.as_str(), scalar_to_string(value)) else {
            continue;
        };
        fields.insert(key.to_string(), value);
    }
    let empty: Vec<String> = REQUIRED_NON_EMPTY
        .iter()
        .filter(|key| fields.get(**key).is_none_or(|value| value.trim().is_empty()))
        .map(|key| (*key).to_string())
        .collect();
    if !empty.is_empty() {
        return Err(ConfigError::InvalidProfile(empty));
    }
    let db_type = fields.get("db_type").cloned().unwrap_or_default();
    debug!(profile = project, %target, %db_type, "loaded profile");
    Ok(Profile {
        project: project.to_string(),
        target,
        db_type,
        fields,
        profile_dir: profile_dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PROFILES: &str = "\
profiles:
  demo:
    target: dev
    outputs:
      dev:
        db_type: postgres
        host: localhost
        port: 5432
        schema: sandbox
      broken:
        db_type: ''
";

    #[test]
    fn loads_default_target_and_stringifies_scalars() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROFILES_FILENAME), PROFILES).unwrap();
        let profile = load_profile(dir.path(), "demo", None).unwrap();
        assert_eq!(profile.target, "dev");
        assert_eq!(profile.db_type, "postgres");
        assert_eq!(profile.fields.get("port").map(String::as_str), Some("5432"));
        assert_eq!(
            profile.google_credentials_path(),
            dir.path().join("google").join("demo.json")
        );
    }

    #[test]
    fn empty_db_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROFILES_FILENAME), PROFILES).unwrap();
        let err = load_profile(dir.path(), "demo", Some("broken")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "the following profile fields cannot be empty: db_type"
        );
    }

    #[test]
    fn unknown_profile_and_target_are_named() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROFILES_FILENAME), PROFILES).unwrap();
        assert!(matches!(
            load_profile(dir.path(), "other", None),
            Err(ConfigError::ProfileNotFound { .. })
        ));
        assert!(matches!(
            load_profile(dir.path(), "demo", Some("prod")),
            Err(ConfigError::ProfileTargetNotFound { .. })
        ));
    }
}
