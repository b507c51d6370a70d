//! Google Sheets v4 values API client.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::error::{FetchError, Result};
use crate::source::{SheetRequest, SheetSource};
use crate::table::SheetTable;

/// Sheets API base URL.
const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const USER_AGENT_VALUE: &str = concat!("sheetpipe/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// How requests are authorised.
#[derive(Clone, PartialEq, Eq)]
pub enum GoogleAuth {
    /// OAuth bearer token.
    AccessToken(String),
    /// API key, only valid for publicly shared sheets.
    ApiKey(String),
}

impl fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken(_) => f.write_str("AccessToken([REDACTED])"),
            Self::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
        }
    }
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
}

impl GoogleAuth {
    /// Read `access_token` or `api_key` from a JSON credentials file.
    pub fn from_credentials_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(FetchError::CredentialsMissing(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|error| FetchError::CredentialsInvalid {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        Self::from_json(path, &text)
    }

    fn from_json(path: &Path, text: &str) -> Result<Self> {
        let file: CredentialsFile =
            serde_json::from_str(text).map_err(|error| FetchError::CredentialsInvalid {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;
        let non_empty = |value: Option<String>| value.filter(|value| !value.trim().is_empty());
        if let Some(token) = non_empty(file.access_token) {
            Ok(Self::AccessToken(token))
        } else if let Some(key) = non_empty(file.api_key) {
            Ok(Self::ApiKey(key))
        } else {
            Err(FetchError::CredentialsInvalid {
                path: path.to_path_buf(),
                reason: "expected a non-empty access_token or api_key".to_string(),
            })
        }
    }
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<WorksheetMeta>,
}

#[derive(Deserialize)]
struct WorksheetMeta {
    properties: WorksheetProperties,
}

#[derive(Deserialize)]
struct WorksheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Blocking Sheets client.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    client: Client,
    auth: GoogleAuth,
    base_url: Url,
}

impl GoogleSheetsClient {
    pub fn new(auth: GoogleAuth) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = Url::parse(SHEETS_API_URL).map_err(|e| FetchError::Url(e.to_string()))?;
        Ok(Self {
            client,
            auth,
            base_url,
        })
    }

    /// Point the client at another endpoint, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url).map_err(|e| FetchError::Url(e.to_string()))?;
        Ok(self)
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if let GoogleAuth::ApiKey(key) = &self.auth {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, request: &SheetRequest) -> Result<T> {
        debug!(url = %redacted_url(&url), "google sheets request");
        let mut builder = self.client.get(url);
        if let GoogleAuth::AccessToken(token) = &self.auth {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(api_error(status, &body, request));
        }
        Ok(response.json()?)
    }

    fn first_worksheet(&self, request: &SheetRequest) -> Result<String> {
        let mut url = self.url(&[&request.sheet_key])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let meta: SpreadsheetMeta = self.get_json(url, request)?;
        meta.sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| FetchError::WorksheetNotFound {
                sheet_key: request.sheet_key.clone(),
                worksheet: "<first worksheet>".to_string(),
            })
    }
}

impl SheetSource for GoogleSheetsClient {
    fn fetch(&self, request: &SheetRequest) -> Result<SheetTable> {
        let worksheet = match &request.worksheet {
            Some(name) => name.clone(),
            None => self.first_worksheet(request)?,
        };
        let range = quote_range(&worksheet);
        let url = self.url(&[&request.sheet_key, "values", &range])?;
        let values: ValueRange = self.get_json(url, request)?;
        let rows: Vec<Vec<String>> = values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        info!(
            worksheet = %worksheet,
            rows = rows.len().saturating_sub(1),
            "fetched worksheet"
        );
        SheetTable::from_values(rows)
    }
}

/// A1 range covering a whole worksheet.
fn quote_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn api_error(status: StatusCode, body: &str, request: &SheetRequest) -> FetchError {
    if status == StatusCode::NOT_FOUND {
        return FetchError::SpreadsheetNotFound(request.sheet_key.clone());
    }
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| ApiErrorDetail {
            code: status.as_u16(),
            message: body.trim().to_string(),
            status: status.canonical_reason().unwrap_or_default().to_string(),
        });
    if detail.code == 400 && detail.message.contains("Unable to parse range") {
        return FetchError::WorksheetNotFound {
            sheet_key: request.sheet_key.clone(),
            worksheet: request.worksheet.clone().unwrap_or_default(),
        };
    }
    FetchError::Api {
        code: detail.code,
        status: detail.status,
        message: detail.message,
    }
}

fn redacted_url(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
