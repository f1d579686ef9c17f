//! JSON exchange format for editing a schema as text.
//!
//! The document is an array of `{ "name": ..., "description": ... }` objects
//! in column order.

use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::{ColumnDefinition, Schema};

/// Outcome of importing an exchange document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeImport {
    pub schema: Schema,
    /// Shape problems that were tolerated during import.
    pub issues: Vec<String>,
}

/// Emit the JSON Schema for the exchange document.
pub fn exchange_json_schema() -> RootSchema {
    schema_for!(Vec<ColumnDefinition>)
}

/// Render a schema as a pretty-printed exchange document.
pub fn to_exchange_json(schema: &Schema) -> Result<String> {
    serde_json::to_string_pretty(schema).map_err(|err| Error::Exchange(err.to_string()))
}

/// Parse an exchange document into a new schema.
///
/// Text that is not JSON, or JSON whose top level is not an array, is
/// rejected. Elements are read leniently: a missing or non-string field
/// becomes an empty string (scalars are stringified) and is reported in
/// [`ExchangeImport::issues`].
pub fn import_exchange(text: &str) -> Result<ExchangeImport> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| Error::Exchange(err.to_string()))?;

    let Value::Array(items) = &value else {
        return Err(Error::Exchange(
            "schema document must be a JSON array".to_string(),
        ));
    };

    let issues = shape_issues(&value)?;
    let schema = items
        .iter()
        .map(|item| ColumnDefinition::new(field_text(item, "name"), field_text(item, "description")))
        .collect();

    Ok(ExchangeImport { schema, issues })
}

fn shape_issues(value: &Value) -> Result<Vec<String>> {
    let schema_json = serde_json::to_value(exchange_json_schema())
        .map_err(|err| Error::Exchange(err.to_string()))?;
    let compiled =
        JSONSchema::compile(&schema_json).map_err(|err| Error::Exchange(err.to_string()))?;

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(value) {
        for error in errors {
            let path = error.instance_path.to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            issues.push(format!("{path}: {error}"));
        }
    }
    Ok(issues)
}

fn field_text(item: &Value, key: &str) -> String {
    match item.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_columns_in_order() {
        let text = r#"[{"name":"id","description":"Unique id"},{"name":"email","description":""}]"#;
        let import = import_exchange(text).expect("import");
        assert_eq!(import.schema.names(), vec!["id", "email"]);
        assert_eq!(import.schema.columns()[0].description, "Unique id");
        assert!(import.issues.is_empty());
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(matches!(
            import_exchange(r#"{"name":"id"}"#),
            Err(Error::Exchange(_))
        ));
        assert!(matches!(import_exchange("not json"), Err(Error::Exchange(_))));
    }

    #[test]
    fn tolerates_odd_elements_and_reports_them() {
        let import = import_exchange(r#"[{"name": 7}, "loose", {"description": "only"}]"#)
            .expect("import");
        assert_eq!(import.schema.names(), vec!["7", "", ""]);
        assert_eq!(import.schema.columns()[2].description, "only");
        assert!(!import.issues.is_empty());
    }

    #[test]
    fn export_then_import_preserves_schema() {
        let schema: Schema = vec![
            ColumnDefinition::new("name", "Product name"),
            ColumnDefinition::new("price", "Numeric value \"USD\""),
        ]
        .into_iter()
        .collect();
        let text = to_exchange_json(&schema).expect("export");
        assert!(text.starts_with('['));
        assert_eq!(import_exchange(&text).expect("import").schema, schema);
    }
}
