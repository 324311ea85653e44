use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Number;

// ---------------------------------------------------------------------------
// Analyzer response
// ---------------------------------------------------------------------------

/// One parsed line from the analyzer response. Every field is optional;
/// the analyzer emits null for anything it could not extract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionLine {
    pub date: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Number>,
    pub unit_price: Option<Number>,
    pub amount: Option<Number>,
    pub notes: Option<String>,
}

impl TransactionLine {
    /// A line is valid iff at least one field is present and non-null.
    pub fn is_valid(&self) -> bool {
        self.date.is_some()
            || self.description.is_some()
            || self.quantity.is_some()
            || self.unit_price.is_some()
            || self.amount.is_some()
            || self.notes.is_some()
    }
}

/// Shape-checked analyzer response: `transactions` holds the valid
/// subsequence only, in its original relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedResponse {
    pub total_amount: Option<Number>,
    pub transactions: Vec<TransactionLine>,
}

// ---------------------------------------------------------------------------
// Record patch (host wire shape)
// ---------------------------------------------------------------------------

/// Element kind tag carried on every table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellKind {
    SingleLineText,
    Number,
}

/// One typed cell inside a table row: `{"type": "NUMBER", "value": "500"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellValue {
    #[serde(rename = "type")]
    pub kind: CellKind,
    pub value: String,
}

/// One table row: `{"value": {"<column code>": <cell>, …}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub value: BTreeMap<String, CellValue>,
}

/// A single field write. Scalar fields carry a string value; table fields
/// carry the full replacement row sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldPatch {
    Scalar { value: String },
    Table { value: Vec<TableRow> },
}

/// The patch written back to the host record, keyed by field code.
/// Serializes to the exact `record` object of the kintone record API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordPatch {
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldPatch>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scalar(&mut self, code: &str, value: impl Into<String>) {
        self.fields.insert(code.to_string(), FieldPatch::Scalar { value: value.into() });
    }

    /// Replaces (never appends to) the table field's rows.
    pub fn set_table(&mut self, code: &str, rows: Vec<TableRow>) {
        self.fields.insert(code.to_string(), FieldPatch::Table { value: rows });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
