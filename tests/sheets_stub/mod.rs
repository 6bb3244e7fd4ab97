use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::Value;

pub const DOCUMENT_ID: &str = "1StubDocument-Id_42";
pub const API_KEY: &str = "test-key";

/// Serves one canned batch-values response for every matching request.
#[derive(Debug, Clone)]
pub struct SheetsStubConfig {
    pub status: u16,
    pub body: Value,
}

impl SheetsStubConfig {
    pub fn values(story: Value, steps: Value) -> Self {
        Self {
            status: 200,
            body: serde_json::json!({
                "spreadsheetId": DOCUMENT_ID,
                "valueRanges": [
                    { "range": "Story!A1:Z1000", "majorDimension": "ROWS", "values": story },
                    { "range": "Steps!A1:Z1000", "majorDimension": "ROWS", "values": steps },
                ],
            }),
        }
    }

    pub fn error(code: u16, message: &str) -> Self {
        Self {
            status: code,
            body: serde_json::json!({
                "error": { "code": code, "message": message, "status": "INVALID_ARGUMENT" },
            }),
        }
    }
}

pub struct SheetsStub {
    pub endpoint: String,
    pub requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SheetsStub {
    pub fn spawn(config: SheetsStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start sheets stub server");
        let addr = server.server_addr();
        let endpoint = format!("http://{addr}/v4/spreadsheets");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                seen.lock().expect("lock request log").push(url.clone());

                let expected_path = format!("/v4/spreadsheets/{DOCUMENT_ID}/values:batchGet");
                let path = url.split('?').next().unwrap_or(&url);
                if request.method() != &tiny_http::Method::Get || path != expected_path {
                    let body = serde_json::json!({
                        "error": { "code": 404, "message": "Requested entity was not found." }
                    });
                    let _ = request.respond(
                        tiny_http::Response::from_string(body.to_string()).with_status_code(404),
                    );
                    continue;
                }

                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                let response = tiny_http::Response::from_string(config.body.to_string())
                    .with_status_code(config.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            endpoint,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn sheet_url(&self) -> String {
        format!("https://docs.google.com/spreadsheets/d/{DOCUMENT_ID}/edit#gid=0")
    }

    pub fn request_log(&self) -> Vec<String> {
        self.requests.lock().expect("lock request log").clone()
    }
}

impl Drop for SheetsStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
