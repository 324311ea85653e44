//! Analyzer HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One call: POST the
//! PDF as multipart form data, get the extraction result back as JSON.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};

use crate::error::ClientError;

/// Fixed multipart field name the analyzer expects the PDF under.
pub const PDF_PART_NAME: &str = "pdf_file";

const USER_AGENT: &str = concat!("kinfill/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Analyzer API client (blocking).
#[derive(Clone)]
pub struct AnalyzerClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl AnalyzerClient {
    /// Create a client bound to the analyzer endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self { http, endpoint: endpoint.into() }
    }

    /// Submit a PDF for analysis. Exactly one POST; no retry.
    ///
    /// The declared media type is informational only; the analyzer decides
    /// for itself whether the bytes are a parseable PDF.
    pub fn analyze(&self, file_name: &str, pdf: Vec<u8>) -> Result<serde_json::Value, ClientError> {
        if pdf.is_empty() {
            return Err(ClientError::EmptyFile);
        }

        let part = Part::bytes(pdf)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let form = Form::new().part(PDF_PART_NAME, part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http(status, truncate(&body, 200).to_string()));
        }

        // Read as text first to handle BOM-prefixed responses
        let text = response.text().map_err(|e| ClientError::Network(e.to_string()))?;
        let trimmed = text.trim_start_matches('\u{feff}');
        serde_json::from_str(trimmed).map_err(|e| {
            ClientError::Parse(format!("{} (body: {})", e, truncate(trimmed, 200)))
        })
    }
}

/// Char-boundary-safe prefix of `s`, at most `max` bytes.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
