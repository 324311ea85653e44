use std::fmt;

/// Error type for outbound HTTP calls (analyzer and write-back alike).
#[derive(Debug)]
pub enum ClientError {
    /// Submitted payload was empty; rejected before any network call.
    EmptyFile,
    /// Network error (connect, timeout, body read).
    Network(String),
    /// Non-2xx HTTP status with response body.
    Http(u16, String),
    /// Response body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFile => write!(f, "PDF payload is empty"),
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            Self::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}
