//! Shape validation of the raw analyzer response.
//!
//! The analyzer is an external collaborator; nothing about its output can
//! be trusted beyond "it parsed as JSON". Everything here is tolerant of
//! missing keys and wrong types: a field of the wrong primitive type is
//! treated as absent, and a line with no present fields is dropped.

use serde_json::{Number, Value};

use crate::error::ValidateError;
use crate::model::{TransactionLine, ValidatedResponse};

/// Check the response shape and filter out empty transaction lines.
///
/// Relative order of the surviving lines is preserved.
pub fn validate(raw: &Value) -> Result<ValidatedResponse, ValidateError> {
    let obj = raw.as_object().ok_or(ValidateError::NotAnObject)?;

    let lines = obj
        .get("transactions")
        .and_then(Value::as_array)
        .ok_or(ValidateError::NoTransactions)?;

    let transactions: Vec<TransactionLine> =
        lines.iter().map(parse_line).filter(TransactionLine::is_valid).collect();

    if transactions.is_empty() {
        return Err(ValidateError::NoValidTransactions);
    }

    Ok(ValidatedResponse {
        total_amount: obj.get("total_amount").and_then(number_value),
        transactions,
    })
}

fn parse_line(item: &Value) -> TransactionLine {
    TransactionLine {
        date: string_field(item, "date"),
        description: string_field(item, "description"),
        quantity: number_field(item, "quantity"),
        unit_price: number_field(item, "unit_price"),
        amount: number_field(item, "amount"),
        notes: string_field(item, "notes"),
    }
}

fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}

fn number_field(item: &Value, key: &str) -> Option<Number> {
    item.get(key).and_then(number_value)
}

fn number_value(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}
