use std::env;

use anyhow::{Context, Result};
use sheetpipe_config::{
    InitOptions, InitReport, Project, SheetJob, init_project, load_profile, resolve_job,
};
use sheetpipe_core::{Pipeline, RunOutcome};
use sheetpipe_ingest::{GoogleAuth, GoogleSheetsClient};
use sheetpipe_warehouse::{Destination, build_adapter};
use tracing::{debug, info_span};

use sheetpipe_cli::terminal::TerminalInteraction;

use crate::cli::{InitArgs, UploadArgs};

/// What an upload run did, for the summary.
pub struct UploadResult {
    pub job: SheetJob,
    pub destination: String,
    pub outcome: RunOutcome,
}

pub fn run_upload(args: &UploadArgs) -> Result<UploadResult> {
    let flags = args.run_flags();
    let cwd = env::current_dir().context("read current directory")?;
    let mut project = Project::load(&flags, &cwd).context("load project")?;
    let span = info_span!("project", name = %project.name);
    let _guard = span.enter();

    let profile = load_profile(&project.profile_dir, &project.name, flags.target.as_deref())
        .context("load profile")?;
    if project.target_schema.is_none() {
        project.target_schema = profile
            .fields
            .get("schema")
            .filter(|schema| !schema.trim().is_empty())
            .cloned();
    }
    let job = resolve_job(&flags, &project).context("resolve sheet configuration")?;

    let credentials = profile.google_credentials_path();
    debug!(path = %credentials.display(), "reading google credentials");
    let auth = GoogleAuth::from_credentials_file(&credentials)
        .context("read google credentials")?;
    let client = GoogleSheetsClient::new(auth).context("create google sheets client")?;
    let mut destination = build_adapter(&profile.db_type, &profile.fields)
        .with_context(|| format!("configure '{}' destination", profile.db_type))?;
    let mut interaction = TerminalInteraction::stdio();

    let outcome = Pipeline::new(&client)
        .run(&job, &mut destination, &mut interaction)
        .with_context(|| format!("load sheet into {}", job.target))?;
    Ok(UploadResult {
        destination: destination.describe(),
        job,
        outcome,
    })
}

pub fn run_init(args: &InitArgs) -> Result<InitReport> {
    let project_parent = match &args.project_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("read current directory")?,
    };
    let options = InitOptions {
        project_name: args.project_name.clone(),
        project_parent,
        profile_dir: args.profile_dir.clone(),
        force_profile: args.force_profile,
    };
    init_project(&options).with_context(|| format!("initialise project '{}'", args.project_name))
}
