//! Sheet run with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Fetch**: read the sheet, retrying transient API failures
//! 2. **Filter**: reject empty headers, drop excluded columns, apply renames
//! 3. **Clean**: normalise headers and values, with optional confirmation
//! 4. **Decide**: dry-run and interactive gates
//! 5. **Load**: upload through the destination, then verify the table

use std::thread;
use std::time::Duration;

use polars::prelude::DataFrame;
use sheetpipe_config::{ColumnPlan, SheetJob};
use sheetpipe_ingest::{RetryPolicy, SheetRequest, SheetSource, SheetTable, retry_with};
use sheetpipe_transform::{CleanOptions, clean_frame, exclude_columns, rename_columns};
use sheetpipe_warehouse::{Destination, TableCheck, UploadReport};
use tracing::{debug, info, info_span, warn};

use crate::error::{PipelineError, Result};
use crate::interaction::{Answer, Interaction, Preview, Question};

/// Why a run finished without loading anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DryRun,
    /// The user answered `No` when asked to push.
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Pushed {
        report: UploadReport,
        check: TableCheck,
    },
    Skipped(SkipReason),
    /// The user answered `Abort`; the caller should exit non-zero.
    Aborted,
}

pub struct Pipeline<'a> {
    source: &'a dyn SheetSource,
    retry: RetryPolicy,
    sleep: fn(Duration),
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn SheetSource) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
            sleep: thread::sleep,
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy, sleep: fn(Duration)) -> Self {
        self.retry = retry;
        self.sleep = sleep;
        self
    }

    /// Run every stage for `job`.
    pub fn run(
        &self,
        job: &SheetJob,
        destination: &mut dyn Destination,
        interaction: &mut dyn Interaction,
    ) -> Result<RunOutcome> {
        let label = job.sheet_name.as_deref().unwrap_or(&job.sheet_key);
        let _span = info_span!("run", sheet = label, table = %job.target).entered();
        let plan = job.plan();

        let df = self.filtered(job, &plan)?;

        // ====================================================================
        // Stage 3: Clean
        // ====================================================================
        let mut perform_cleanup = true;
        if job.interactive {
            interaction.preview(Preview::BeforeCleanup, &df);
            match interaction.confirm(Question::PerformCleanup) {
                Answer::Yes => {}
                Answer::No => perform_cleanup = false,
                Answer::Abort => return Ok(aborted()),
            }
        }

        let df = if perform_cleanup {
            let options = CleanOptions::default().with_snake_case_camel(plan.snake_case_camel);
            let cleaned = clean_frame(&df, &options)?;
            debug!(columns = ?cleaned.get_column_names(), "columns after cleanup");
            if job.dry_run || job.interactive {
                interaction.preview(Preview::AfterCleanup, &cleaned);
            }
            // ================================================================
            // Stage 4: Decide
            // ================================================================
            if job.interactive {
                match interaction.confirm(Question::PushToDatabase) {
                    Answer::Yes => {}
                    Answer::No => {
                        info!("nothing pushed: declined at the push prompt");
                        return Ok(RunOutcome::Skipped(SkipReason::Declined));
                    }
                    Answer::Abort => return Ok(aborted()),
                }
            }
            cleaned
        } else {
            info!("cleanup skipped; loading columns as fetched");
            df
        };

        if job.dry_run {
            info!("nothing pushed since the run is a dry run");
            return Ok(RunOutcome::Skipped(SkipReason::DryRun));
        }

        // ====================================================================
        // Stage 5: Load
        // ====================================================================
        let _load = info_span!("load").entered();
        info!(destination = %destination.describe(), "pushing sheet");
        let report = destination.upload(&df, &job.target, &plan.casts, job.policy)?;
        let check = destination.check_table(&job.target)?;
        Ok(RunOutcome::Pushed { report, check })
    }

    /// Fetch and filter without cleaning.
    pub fn filtered(&self, job: &SheetJob, plan: &ColumnPlan) -> Result<DataFrame> {
        // ====================================================================
        // Stage 1: Fetch
        // ====================================================================
        let table = self.fetch(job)?;

        // ====================================================================
        // Stage 2: Filter
        // ====================================================================
        let _filter = info_span!("filter").entered();
        let empty = table.empty_header_positions();
        if !empty.is_empty() {
            return Err(PipelineError::EmptyHeaders(empty));
        }
        let df = table.to_dataframe()?;
        let (df, _missing) = exclude_columns(&df, &plan.excluded)?;
        let df = rename_columns(&df, &plan.rename)?;
        debug!(columns = ?df.get_column_names(), "columns after exclusion and renaming");
        Ok(df)
    }

    pub fn fetch(&self, job: &SheetJob) -> Result<SheetTable> {
        let _span = info_span!("fetch").entered();
        let mut request = SheetRequest::new(&job.sheet_key);
        if let Some(worksheet) = &job.worksheet {
            request = request.with_worksheet(worksheet);
        }
        info!(sheet_key = %job.sheet_key, worksheet = ?job.worksheet, "importing sheet");
        let table = retry_with(&self.retry, self.sleep, || self.source.fetch(&request))?;
        info!(
            columns = table.width(),
            rows = table.height(),
            "sheet imported"
        );
        Ok(table)
    }
}

fn aborted() -> RunOutcome {
    warn!("run aborted by user");
    RunOutcome::Aborted
}
