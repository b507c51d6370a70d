use polars::error::PolarsError;
use sheetpipe_ingest::FetchError;
use sheetpipe_transform::TransformError;
use sheetpipe_warehouse::WarehouseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetching sheet failed: {0}")]
    Fetch(#[from] FetchError),
    /// Zero-based column positions.
    #[error(
        "sheet has columns with empty headers at position(s) {}; headers must be in the first row",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    EmptyHeaders(Vec<usize>),
    #[error("building dataset failed: {0}")]
    Frame(#[from] PolarsError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
