//! The mapping step: validated response → record patch.

use std::collections::BTreeMap;

use serde_json::Number;

use crate::config::{ColumnMapping, FieldMapping};
use crate::model::{CellKind, CellValue, RecordPatch, TableRow, TransactionLine, ValidatedResponse};

/// Map a validated response onto a fresh record patch.
///
/// Pure and deterministic: same inputs always yield the same patch. The
/// scalar amount field is written only when `total_amount` is present; the
/// table field is always written and replaces any pre-existing rows. Numbers
/// are stringified because the host stores number fields as decimal strings.
pub fn reconcile(validated: &ValidatedResponse, mapping: &FieldMapping) -> RecordPatch {
    let mut patch = RecordPatch::new();

    if let Some(total) = &validated.total_amount {
        patch.set_scalar(&mapping.amount_field, total.to_string());
    }

    let rows = validated
        .transactions
        .iter()
        .map(|line| build_row(line, &mapping.columns))
        .collect();
    patch.set_table(&mapping.table_field, rows);

    patch
}

fn build_row(line: &TransactionLine, columns: &ColumnMapping) -> TableRow {
    let mut value = BTreeMap::new();
    value.insert(columns.date.clone(), text_cell(&line.date));
    value.insert(columns.description.clone(), text_cell(&line.description));
    value.insert(columns.quantity.clone(), number_cell(&line.quantity));
    value.insert(columns.unit_price.clone(), number_cell(&line.unit_price));
    value.insert(columns.amount.clone(), number_cell(&line.amount));
    value.insert(columns.notes.clone(), text_cell(&line.notes));
    TableRow { value }
}

fn text_cell(field: &Option<String>) -> CellValue {
    CellValue {
        kind: CellKind::SingleLineText,
        value: field.clone().unwrap_or_default(),
    }
}

fn number_cell(field: &Option<Number>) -> CellValue {
    CellValue {
        kind: CellKind::Number,
        // Absent/null becomes the empty string; zero stays "0".
        value: field.as_ref().map(Number::to_string).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use serde_json::json;

    fn mapping() -> FieldMapping {
        FieldMapping::default()
    }

    #[test]
    fn invoice_scenario_fills_amount_and_one_row() {
        let raw = json!({
            "total_amount": 1500,
            "transactions": [{
                "date": "2024-01-01",
                "description": "Item A",
                "quantity": 2,
                "unit_price": 500,
                "amount": 1000,
                "notes": "",
            }],
        });
        let validated = validate(&raw).unwrap();
        let patch = reconcile(&validated, &mapping());

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["ご請求金額"]["value"], "1500");

        let rows = json["テーブル"]["value"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0]["value"];
        assert_eq!(row["取引日付"]["value"], "2024-01-01");
        assert_eq!(row["内容"]["value"], "Item A");
        assert_eq!(row["数量"]["value"], "2");
        assert_eq!(row["単価"]["value"], "500");
        assert_eq!(row["金額"]["value"], "1000");
        assert_eq!(row["備考"]["value"], "");
        assert_eq!(row["数量"]["type"], "NUMBER");
        assert_eq!(row["取引日付"]["type"], "SINGLE_LINE_TEXT");
    }

    #[test]
    fn absent_total_amount_skips_the_scalar_field() {
        let validated = ValidatedResponse {
            total_amount: None,
            transactions: vec![TransactionLine {
                description: Some("only line".into()),
                ..Default::default()
            }],
        };
        let patch = reconcile(&validated, &mapping());
        assert!(!patch.fields.contains_key("ご請求金額"));
        assert!(patch.fields.contains_key("テーブル"));
    }

    #[test]
    fn zero_quantity_maps_to_zero_string() {
        let validated = ValidatedResponse {
            total_amount: None,
            transactions: vec![TransactionLine {
                quantity: Some(Number::from(0)),
                ..Default::default()
            }],
        };
        let patch = reconcile(&validated, &mapping());
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["テーブル"]["value"][0]["value"]["数量"]["value"], "0");
        // The other number cells were absent and must stay empty.
        assert_eq!(json["テーブル"]["value"][0]["value"]["単価"]["value"], "");
    }

    #[test]
    fn fractional_numbers_keep_their_decimal_form() {
        let raw = json!({ "transactions": [{ "quantity": 2.5, "unit_price": 10.25 }] });
        let validated = validate(&raw).unwrap();
        let patch = reconcile(&validated, &mapping());
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["テーブル"]["value"][0]["value"]["数量"]["value"], "2.5");
        assert_eq!(json["テーブル"]["value"][0]["value"]["単価"]["value"], "10.25");
    }

    #[test]
    fn one_row_per_valid_line_in_order() {
        let raw = json!({
            "transactions": [
                { "description": "a" },
                { "description": "b" },
                { "description": "c" },
            ],
        });
        let validated = validate(&raw).unwrap();
        let patch = reconcile(&validated, &mapping());
        let json = serde_json::to_value(&patch).unwrap();
        let rows = json["テーブル"]["value"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        let descriptions: Vec<_> =
            rows.iter().map(|r| r["value"]["内容"]["value"].as_str().unwrap()).collect();
        assert_eq!(descriptions, ["a", "b", "c"]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let raw = json!({
            "total_amount": 42,
            "transactions": [{ "description": "x", "amount": 42 }],
        });
        let validated = validate(&raw).unwrap();
        let first = reconcile(&validated, &mapping());
        let second = reconcile(&validated, &mapping());
        assert_eq!(first, second);
        assert_eq!(serde_json::to_value(&first).unwrap(), serde_json::to_value(&second).unwrap());
    }

    #[test]
    fn custom_mapping_renames_every_code() {
        let custom = FieldMapping::from_toml(
            r#"
amount_field = "total"
table_field = "lines"

[columns]
date        = "d"
description = "desc"
quantity    = "q"
unit_price  = "u"
amount      = "a"
notes       = "n"
"#,
        )
        .unwrap();
        let raw = json!({ "total_amount": 9, "transactions": [{ "quantity": 1 }] });
        let validated = validate(&raw).unwrap();
        let patch = reconcile(&validated, &custom);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["total"]["value"], "9");
        assert_eq!(json["lines"]["value"][0]["value"]["q"]["value"], "1");
        assert!(json["lines"]["value"][0]["value"].get("数量").is_none());
    }
}
