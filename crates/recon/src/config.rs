use serde::Deserialize;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Field mapping
// ---------------------------------------------------------------------------

/// Field codes on the target record. Defaults match the invoice app this
/// tool was originally built against; override via a TOML mapping file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    /// Scalar field receiving the invoice total (string-valued decimal).
    #[serde(default = "default_amount_field")]
    pub amount_field: String,
    /// Table field whose rows are replaced with the extracted lines.
    #[serde(default = "default_table_field")]
    pub table_field: String,
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Column codes inside the table field. Element kinds are fixed:
/// date/description/notes are text columns, the rest are number columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_date")]
    pub date: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
    #[serde(default = "default_unit_price")]
    pub unit_price: String,
    #[serde(default = "default_amount")]
    pub amount: String,
    #[serde(default = "default_notes")]
    pub notes: String,
}

fn default_amount_field() -> String {
    "ご請求金額".into()
}
fn default_table_field() -> String {
    "テーブル".into()
}
fn default_date() -> String {
    "取引日付".into()
}
fn default_description() -> String {
    "内容".into()
}
fn default_quantity() -> String {
    "数量".into()
}
fn default_unit_price() -> String {
    "単価".into()
}
fn default_amount() -> String {
    "金額".into()
}
fn default_notes() -> String {
    "備考".into()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: default_date(),
            description: default_description(),
            quantity: default_quantity(),
            unit_price: default_unit_price(),
            amount: default_amount(),
            notes: default_notes(),
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            amount_field: default_amount_field(),
            table_field: default_table_field(),
            columns: ColumnMapping::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl FieldMapping {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let mapping: FieldMapping =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = [
            ("amount_field", &self.amount_field),
            ("table_field", &self.table_field),
            ("columns.date", &self.columns.date),
            ("columns.description", &self.columns.description),
            ("columns.quantity", &self.columns.quantity),
            ("columns.unit_price", &self.columns.unit_price),
            ("columns.amount", &self.columns.amount),
            ("columns.notes", &self.columns.notes),
        ];

        for (which, code) in &entries {
            if code.trim().is_empty() {
                return Err(ConfigError::EmptyFieldCode((*which).into()));
            }
        }

        // Field codes must be pairwise distinct: the host rejects a record
        // object with duplicate keys silently dropping one of them.
        for (i, (_, code)) in entries.iter().enumerate() {
            if entries[i + 1..].iter().any(|(_, other)| other == code) {
                return Err(ConfigError::DuplicateFieldCode((*code).clone()));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let mapping = FieldMapping::default();
        assert!(mapping.validate().is_ok());
        assert_eq!(mapping.amount_field, "ご請求金額");
        assert_eq!(mapping.table_field, "テーブル");
        assert_eq!(mapping.columns.quantity, "数量");
    }

    #[test]
    fn parse_full_mapping() {
        let input = r#"
amount_field = "invoice_total"
table_field = "lines"

[columns]
date        = "line_date"
description = "memo"
quantity    = "qty"
unit_price  = "unit"
amount      = "line_amount"
notes       = "remarks"
"#;
        let mapping = FieldMapping::from_toml(input).unwrap();
        assert_eq!(mapping.amount_field, "invoice_total");
        assert_eq!(mapping.table_field, "lines");
        assert_eq!(mapping.columns.date, "line_date");
        assert_eq!(mapping.columns.notes, "remarks");
    }

    #[test]
    fn omitted_entries_fall_back_to_defaults() {
        let mapping = FieldMapping::from_toml(r#"amount_field = "total""#).unwrap();
        assert_eq!(mapping.amount_field, "total");
        assert_eq!(mapping.table_field, "テーブル");
        assert_eq!(mapping.columns.date, "取引日付");
    }

    #[test]
    fn reject_empty_field_code() {
        let err = FieldMapping::from_toml(r#"amount_field = """#).unwrap_err();
        assert!(err.to_string().contains("amount_field"));
    }

    #[test]
    fn reject_duplicate_field_code() {
        let input = r#"
amount_field = "total"
table_field = "total"
"#;
        let err = FieldMapping::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("'total'"));
    }

    #[test]
    fn reject_duplicate_column_code() {
        let input = r#"
[columns]
quantity = "数"
amount   = "数"
"#;
        let err = FieldMapping::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("mapped more than once"));
    }

    #[test]
    fn reject_malformed_toml() {
        let err = FieldMapping::from_toml("amount_field = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
