//! Tests for project scaffolding.

use std::fs;

use sheetpipe_config::{
    ConfigError, InitOptions, Project, RunFlags, init_project, load_profile,
};

fn options(root: &std::path::Path, force_profile: bool) -> InitOptions {
    InitOptions {
        project_name: "demo".to_string(),
        project_parent: root.to_path_buf(),
        profile_dir: Some(root.join("profiles")),
        force_profile,
    }
}

#[test]
fn scaffolded_project_loads() {
    let root = tempfile::tempdir().unwrap();
    let report = init_project(&options(root.path(), false)).unwrap();
    assert!(report.project_created);
    assert!(report.google_credentials.is_file());

    let flags = RunFlags {
        project_dir: Some(report.project_dir.clone()),
        profile_dir: Some(root.path().join("profiles")),
        ..RunFlags::default()
    };
    let project = Project::load(&flags, root.path()).unwrap();
    assert_eq!(project.name, "demo");
    assert_eq!(project.target_schema.as_deref(), Some("sandbox"));
    assert!(project.creation.create_table);

    let profile = load_profile(&project.profile_dir, &project.name, None).unwrap();
    assert_eq!(profile.db_type, "duckdb");
}

#[test]
fn refuses_to_overwrite_existing_project() {
    let root = tempfile::tempdir().unwrap();
    init_project(&options(root.path(), false)).unwrap();
    let err = init_project(&options(root.path(), false)).unwrap_err();
    assert!(matches!(err, ConfigError::ProjectExists(_)));
}

#[test]
fn force_profile_keeps_existing_files() {
    let root = tempfile::tempdir().unwrap();
    let first = init_project(&options(root.path(), false)).unwrap();
    fs::write(&first.profiles_file, "profiles: {}\n").unwrap();

    let second = init_project(&options(root.path(), true)).unwrap();
    assert!(!second.project_created);
    assert_eq!(
        fs::read_to_string(&second.profiles_file).unwrap(),
        "profiles: {}\n"
    );
}
