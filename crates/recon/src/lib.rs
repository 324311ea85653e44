//! `kinfill-recon` — analyzer-response validation and record mapping.
//!
//! Pure engine crate: receives a parsed analyzer response, returns the
//! record patch to write into the host record. No HTTP or IO dependencies.

pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod validate;

pub use config::{ColumnMapping, FieldMapping};
pub use error::{ConfigError, ValidateError};
pub use model::{CellKind, CellValue, FieldPatch, RecordPatch, TableRow, TransactionLine, ValidatedResponse};
pub use reconcile::reconcile;
pub use validate::validate;
