use std::path::PathBuf;

use thiserror::Error;

/// API statuses treated as transient.
pub const TRANSIENT_STATUSES: &[&str] = &["RESOURCE_EXHAUSTED", "UNAVAILABLE", "INTERNAL"];
/// HTTP codes treated as transient.
pub const TRANSIENT_CODES: &[u16] = &[429, 500, 503];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("spreadsheet '{0}' was not found or is not shared with these credentials")]
    SpreadsheetNotFound(String),
    #[error("no worksheet matching '{worksheet}' in spreadsheet '{sheet_key}'")]
    WorksheetNotFound {
        sheet_key: String,
        worksheet: String,
    },
    #[error("duplicate column names found in sheet: {}; fix the sheet", .0.join(", "))]
    DuplicateHeaders(Vec<String>),
    #[error("google api error {code} {status}: {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("google credentials not found at {0}")]
    CredentialsMissing(PathBuf),
    #[error("invalid google credentials in {path}: {reason}")]
    CredentialsInvalid { path: PathBuf, reason: String },
}

impl FetchError {
    /// Whether a retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { code, status, .. } => {
                TRANSIENT_STATUSES.contains(&status.as_str()) || TRANSIENT_CODES.contains(code)
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api(code: u16, status: &str) -> FetchError {
        FetchError::Api {
            code,
            status: status.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn transient_classification() {
        assert!(api(429, "RESOURCE_EXHAUSTED").is_transient());
        assert!(api(503, "UNAVAILABLE").is_transient());
        assert!(api(500, "INTERNAL").is_transient());
        assert!(!api(403, "PERMISSION_DENIED").is_transient());
        assert!(!api(400, "INVALID_ARGUMENT").is_transient());
        assert!(!FetchError::SpreadsheetNotFound("k".to_string()).is_transient());
        assert!(!FetchError::DuplicateHeaders(vec!["a".to_string()]).is_transient());
    }
}
