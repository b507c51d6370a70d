//! End-to-end run of one sheet.
//!
//! [`Pipeline`] fetches the sheet, filters and cleans it, asks an
//! [`Interaction`] when the run is interactive, and hands the result to a
//! [`Destination`](sheetpipe_warehouse::Destination).

pub mod error;
pub mod interaction;
pub mod pipeline;

pub use error::{PipelineError, Result};
pub use interaction::{Answer, Interaction, Preview, Question, Unattended};
pub use pipeline::{Pipeline, RunOutcome, SkipReason};
