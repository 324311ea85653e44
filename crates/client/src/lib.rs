//! Wire contracts and the submission flow.
//!
//! This crate is the single source of truth for both outbound calls:
//! the analyzer submit (multipart PDF upload) and the host record
//! write-back. `submit` chains them through the pure mapping engine.
//!
//! No GUI concepts. No retries. No progress bars beyond the notifier.

mod analyzer;
mod error;
mod kintone;
mod submit;

pub use analyzer::{AnalyzerClient, PDF_PART_NAME};
pub use error::ClientError;
pub use kintone::{KintoneClient, RecordTarget};
pub use submit::{submit, RecordSink, Severity, SubmitError, SubmitOutcome};
