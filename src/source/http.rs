//! Remote row source (feature `remote`).
//!
//! Fetches a CSV document from a URL on a fixed interval in a background
//! thread and makes the parsed rows available via `poll()`. Built for
//! spreadsheet CSV exports (the upstream feed is a Google Sheets
//! `out:csv` endpoint), but any URL serving CSV works.

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use super::{rows_from_csv, RawRows, RowSource};

/// A row source that periodically fetches CSV over HTTP.
///
/// There is no retry or backoff beyond the fetch interval itself: a failed
/// fetch records an error and the next interval tries again from scratch.
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<RawRows>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    /// Snapshot of `last_error`, refreshed on every poll so `error()` can
    /// hand out a borrow.
    cached_error: Option<String>,
}

impl HttpSource {
    /// Spawn a background fetcher for the given URL.
    pub fn spawn(url: &str, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(4);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let fetch_url = url.to_string();

        // A dedicated thread with a blocking client: fetches are strictly
        // sequential and the UI never waits on one.
        std::thread::spawn(move || {
            let client = match reqwest::blocking::Client::builder()
                .timeout(interval.max(Duration::from_secs(5)))
                .build()
            {
                Ok(client) => client,
                Err(e) => {
                    *error_handle.lock().unwrap() = Some(format!("Client error: {}", e));
                    return;
                }
            };

            loop {
                match fetch_once(&client, &fetch_url) {
                    Ok(rows) => {
                        *error_handle.lock().unwrap() = None;
                        if tx.blocking_send(rows).is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    Err(e) => {
                        *error_handle.lock().unwrap() = Some(e);
                    }
                }
                std::thread::sleep(interval);
            }
        });

        Self {
            receiver: rx,
            description: format!("url: {}", url),
            last_error,
            cached_error: None,
        }
    }

    /// Get the last fetch error message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

fn fetch_once(client: &reqwest::blocking::Client, url: &str) -> Result<RawRows, String> {
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("Fetch error: {}", e))?;
    let text = response.text().map_err(|e| format!("Fetch error: {}", e))?;
    rows_from_csv(Cursor::new(text)).map_err(|e| format!("Parse error: {}", e))
}

impl RowSource for HttpSource {
    fn poll(&mut self) -> Option<RawRows> {
        let rows = match self.receiver.try_recv() {
            Ok(rows) => Some(rows),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                *self.last_error.lock().unwrap() = Some("Fetcher stopped".to_string());
                None
            }
        };
        self.cached_error = self.last_error.lock().unwrap().clone();
        rows
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.cached_error.as_deref()
    }
}
