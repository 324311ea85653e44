//! Host record write-back over the kintone REST record API.
//!
//! The token is pass-through configuration: no login flow, no refresh,
//! no credential storage.

use std::time::Duration;

use kinfill_recon::RecordPatch;

use crate::error::ClientError;
use crate::submit::RecordSink;

const USER_AGENT: &str = concat!("kinfill/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const API_TOKEN_HEADER: &str = "X-Cybozu-API-Token";

/// kintone REST API client (blocking).
#[derive(Clone)]
pub struct KintoneClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_token: String,
}

impl KintoneClient {
    /// `base_url` is the subdomain root, e.g. `https://example.cybozu.com`.
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    /// Write a record patch into an existing record. Returns the new
    /// record revision.
    pub fn update_record(
        &self,
        app: u64,
        record_id: u64,
        record: &RecordPatch,
    ) -> Result<u64, ClientError> {
        let url = format!("{}/k/v1/record.json", self.base_url);
        let body = serde_json::json!({
            "app": app,
            "id": record_id,
            "record": record,
        });

        let response = self
            .http
            .put(&url)
            .header(API_TOKEN_HEADER, &self.api_token)
            .json(&body)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http(status, body));
        }

        let json: serde_json::Value =
            response.json().map_err(|e| ClientError::Parse(e.to_string()))?;

        // kintone returns the revision as a decimal string.
        json["revision"]
            .as_str()
            .and_then(|r| r.parse::<u64>().ok())
            .or_else(|| json["revision"].as_u64())
            .ok_or_else(|| ClientError::Parse("missing revision in response".into()))
    }
}

/// One record open for write-back: the sink the submit flow writes into.
pub struct RecordTarget<'a> {
    client: &'a KintoneClient,
    app: u64,
    record_id: u64,
}

impl<'a> RecordTarget<'a> {
    pub fn new(client: &'a KintoneClient, app: u64, record_id: u64) -> Self {
        Self { client, app, record_id }
    }
}

impl RecordSink for RecordTarget<'_> {
    fn write(&mut self, patch: &RecordPatch) -> Result<(), String> {
        self.client
            .update_record(self.app, self.record_id, patch)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn sample_patch() -> RecordPatch {
        let mut patch = RecordPatch::new();
        patch.set_scalar("ご請求金額", "1500");
        patch.set_table("テーブル", Vec::new());
        patch
    }

    #[test]
    fn test_update_record_sends_token_and_wire_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/k/v1/record.json")
                .header("X-Cybozu-API-Token", "tok_123")
                .json_body(serde_json::json!({
                    "app": 7,
                    "id": 42,
                    "record": {
                        "ご請求金額": { "value": "1500" },
                        "テーブル": { "value": [] },
                    },
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({ "revision": "5" }));
        });

        let client = KintoneClient::new(server.base_url(), "tok_123");
        let revision = client.update_record(7, 42, &sample_patch()).unwrap();

        mock.assert();
        assert_eq!(revision, 5);
    }

    #[test]
    fn test_update_record_rejection_maps_to_http() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/k/v1/record.json");
            then.status(403).json_body(serde_json::json!({
                "code": "CB_NO02",
                "message": "No privilege to proceed.",
            }));
        });

        let client = KintoneClient::new(server.base_url(), "tok_bad");
        let err = client.update_record(7, 42, &sample_patch()).unwrap_err();

        match err {
            ClientError::Http(status, body) => {
                assert_eq!(status, 403);
                assert!(body.contains("No privilege"));
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_slash_in_base_url_is_tolerated() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/k/v1/record.json");
            then.status(200).json_body(serde_json::json!({ "revision": "2" }));
        });

        let client = KintoneClient::new(format!("{}/", server.base_url()), "tok");
        client.update_record(1, 1, &sample_patch()).unwrap();
        mock.assert();
    }

    #[test]
    fn test_missing_revision_maps_to_parse() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/k/v1/record.json");
            then.status(200).json_body(serde_json::json!({}));
        });

        let client = KintoneClient::new(server.base_url(), "tok");
        let err = client.update_record(1, 1, &sample_patch()).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
