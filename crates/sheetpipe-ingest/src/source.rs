use crate::error::Result;
use crate::table::SheetTable;

/// Which spreadsheet, and optionally which worksheet, to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRequest {
    pub sheet_key: String,
    /// First worksheet when absent.
    pub worksheet: Option<String>,
}

impl SheetRequest {
    pub fn new(sheet_key: impl Into<String>) -> Self {
        Self {
            sheet_key: sheet_key.into(),
            worksheet: None,
        }
    }

    #[must_use]
    pub fn with_worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = Some(worksheet.into());
        self
    }
}

/// Anything able to produce a raw table of strings.
pub trait SheetSource {
    fn fetch(&self, request: &SheetRequest) -> Result<SheetTable>;
}
