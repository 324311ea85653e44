//! The submission flow: analyze → validate → reconcile → write back.
//!
//! One submission runs to a single terminal state and nothing propagates
//! past it: fatal failures come back as a typed `SubmitError` for the
//! caller to convert into the final error notification, and the
//! no-valid-transactions case ends the flow as an ordinary no-op.
//!
//! The flow is blocking and the sink is borrowed exclusively for its
//! duration, so overlapping submissions against the same target are
//! unrepresentable.

use std::fmt;

use kinfill_recon::{reconcile, validate, FieldMapping, RecordPatch, ValidateError};

use crate::analyzer::AnalyzerClient;
use crate::error::ClientError;

/// Severity tag on a status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Where the reconciled record patch is written.
///
/// The host write-back is behind this seam so the flow can run against
/// the live record API, a dry-run printer, or a test capture alike.
pub trait RecordSink {
    fn write(&mut self, patch: &RecordPatch) -> Result<(), String>;
}

/// Terminal states of a successful (non-error) submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record was written; `rows` table rows replaced the old ones.
    Filled { rows: usize },
    /// Response was well-formed but held no valid transaction lines.
    /// Reported through the notifier; no write-back happened.
    NothingToFill,
}

/// Fatal failure of one submission. No retry, no partial write-back.
#[derive(Debug)]
pub enum SubmitError {
    /// Network failure, non-2xx status, or non-JSON analyzer body.
    Transport(ClientError),
    /// Response shape was unusable (not an object / no transactions array).
    Validation(ValidateError),
    /// The write-back call itself failed.
    WriteBack(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "PDF analysis failed: {}", e),
            Self::Validation(e) => write!(f, "{}", e),
            Self::WriteBack(msg) => write!(f, "record write-back failed: {}", msg),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::WriteBack(_) => None,
        }
    }
}

/// Run one submission end to end.
///
/// `notify` is invoked at each phase transition with a human-readable
/// message; it is the only observable output besides the write-back.
pub fn submit(
    analyzer: &AnalyzerClient,
    mapping: &FieldMapping,
    sink: &mut dyn RecordSink,
    file_name: &str,
    pdf: Vec<u8>,
    notify: &mut dyn FnMut(&str, Severity),
) -> Result<SubmitOutcome, SubmitError> {
    notify(&format!("analyzing {}", file_name), Severity::Info);
    let raw = analyzer.analyze(file_name, pdf).map_err(SubmitError::Transport)?;

    notify("analysis complete, validating response", Severity::Info);
    let validated = match validate(&raw) {
        Ok(v) => v,
        Err(ValidateError::NoValidTransactions) => {
            notify("no valid transactions extracted; nothing to fill", Severity::Error);
            return Ok(SubmitOutcome::NothingToFill);
        }
        Err(e) => return Err(SubmitError::Validation(e)),
    };

    let rows = validated.transactions.len();
    notify(&format!("{} transaction(s) found, filling record", rows), Severity::Info);

    let patch = reconcile(&validated, mapping);
    sink.write(&patch).map_err(SubmitError::WriteBack)?;

    notify("record updated", Severity::Info);
    Ok(SubmitOutcome::Filled { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_messages() {
        let err = SubmitError::Transport(ClientError::Http(500, "boom".into()));
        assert_eq!(err.to_string(), "PDF analysis failed: HTTP 500: boom");

        let err = SubmitError::Validation(ValidateError::NoTransactions);
        assert!(err.to_string().contains("no transactions array"));

        let err = SubmitError::WriteBack("CB_NO02".into());
        assert!(err.to_string().contains("write-back failed"));
    }
}
