//! Fetches against a local HTTP endpoint serving canned Sheets API payloads.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use sheetpipe_ingest::{FetchError, GoogleAuth, GoogleSheetsClient, SheetRequest, SheetSource};

type Route = fn(&str) -> (u16, String);

/// One request as the server saw it: target and lowercased header lines.
#[derive(Debug, Clone)]
struct Seen {
    target: String,
    headers: Vec<String>,
}

struct Endpoint {
    base_url: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Endpoint {
    fn start(route: Route) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                serve(stream, route, &log);
            }
        });
        Self {
            base_url: format!("http://{addr}/v4/spreadsheets"),
            seen,
        }
    }

    fn client(&self, auth: GoogleAuth) -> GoogleSheetsClient {
        GoogleSheetsClient::new(auth)
            .unwrap()
            .with_base_url(&self.base_url)
            .unwrap()
    }

    fn targets(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|seen| seen.target.clone())
            .collect()
    }
}

fn serve(stream: TcpStream, route: Route, log: &Mutex<Vec<Seen>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 || line.trim().is_empty() {
            break;
        }
        headers.push(line.trim().to_lowercase());
    }
    let (status, body) = route(&target);
    log.lock().unwrap().push(Seen { target, headers });
    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .unwrap();
    stream.flush().unwrap();
}

fn path(target: &str) -> &str {
    target.split('?').next().unwrap_or(target)
}

fn orders_workbook(target: &str) -> (u16, String) {
    match path(target) {
        "/v4/spreadsheets/abc" => (
            200,
            r#"{"sheets":[{"properties":{"title":"Orders"}},{"properties":{"title":"Archive"}}]}"#
                .to_string(),
        ),
        "/v4/spreadsheets/abc/values/'Orders'" => (
            200,
            r#"{"range":"Orders!A1:C3","majorDimension":"ROWS","values":[["id","name","amount"],["1","Ann"],["2","Bob",3.5]]}"#
                .to_string(),
        ),
        "/v4/spreadsheets/abc/values/'Bob''s'" => (
            200,
            r#"{"range":"'Bob''s'!A1:A2","values":[["id"],["7"]]}"#.to_string(),
        ),
        "/v4/spreadsheets/abc/values/'Dupes'" => (
            200,
            r#"{"values":[["id","id","x"],["1","2","3"]]}"#.to_string(),
        ),
        "/v4/spreadsheets/abc/values/'Missing'" => (
            400,
            r#"{"error":{"code":400,"message":"Unable to parse range: 'Missing'","status":"INVALID_ARGUMENT"}}"#
                .to_string(),
        ),
        "/v4/spreadsheets/abc/values/'Busy'" => (
            503,
            r#"{"error":{"code":503,"message":"The service is currently unavailable.","status":"UNAVAILABLE"}}"#
                .to_string(),
        ),
        _ => (404, String::new()),
    }
}

fn token() -> GoogleAuth {
    GoogleAuth::AccessToken("secret-token".to_string())
}

#[test]
fn first_worksheet_is_looked_up_when_none_is_named() {
    let endpoint = Endpoint::start(orders_workbook);
    let client = endpoint.client(token());

    let table = client.fetch(&SheetRequest::new("abc")).unwrap();

    assert_eq!(table.headers, vec!["id", "name", "amount"]);
    assert_eq!(
        table.rows,
        vec![vec!["1", "Ann", ""], vec!["2", "Bob", "3.5"]]
    );
    assert_eq!(
        endpoint.targets(),
        vec![
            "/v4/spreadsheets/abc?fields=sheets.properties.title".to_string(),
            "/v4/spreadsheets/abc/values/'Orders'".to_string(),
        ]
    );
    let seen = endpoint.seen.lock().unwrap();
    assert!(
        seen.iter()
            .all(|request| request.headers.contains(&"authorization: bearer secret-token".to_string()))
    );
}

#[test]
fn named_worksheet_skips_the_lookup() {
    let endpoint = Endpoint::start(orders_workbook);
    let client = endpoint.client(GoogleAuth::ApiKey("k".to_string()));

    let table = client
        .fetch(&SheetRequest::new("abc").with_worksheet("Bob's"))
        .unwrap();

    assert_eq!(table.headers, vec!["id"]);
    assert_eq!(table.height(), 1);
    assert_eq!(
        endpoint.targets(),
        vec!["/v4/spreadsheets/abc/values/'Bob''s'?key=k".to_string()]
    );
}

#[test]
fn duplicate_headers_in_fetched_rows_are_rejected() {
    let endpoint = Endpoint::start(orders_workbook);
    let error = endpoint
        .client(token())
        .fetch(&SheetRequest::new("abc").with_worksheet("Dupes"))
        .unwrap_err();
    assert!(matches!(error, FetchError::DuplicateHeaders(names) if names == vec!["id".to_string()]));
}

#[test]
fn http_failures_map_to_fetch_errors() {
    let endpoint = Endpoint::start(orders_workbook);
    let client = endpoint.client(token());

    let unknown = client.fetch(&SheetRequest::new("nope")).unwrap_err();
    assert!(matches!(unknown, FetchError::SpreadsheetNotFound(key) if key == "nope"));

    let missing = client
        .fetch(&SheetRequest::new("abc").with_worksheet("Missing"))
        .unwrap_err();
    assert!(matches!(
        missing,
        FetchError::WorksheetNotFound { ref worksheet, .. } if worksheet == "Missing"
    ));

    let busy = client
        .fetch(&SheetRequest::new("abc").with_worksheet("Busy"))
        .unwrap_err();
    assert!(busy.is_transient());
    assert!(matches!(busy, FetchError::Api { code: 503, .. }));
}
