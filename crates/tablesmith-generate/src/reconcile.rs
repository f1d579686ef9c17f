use serde_json::Value;

use tablesmith_core::Schema;

use crate::errors::ReconciliationError;
use crate::model::{Dataset, Row};

/// Parse a raw provider reply into rows shaped by `schema`.
///
/// The whole reply must be one JSON document. A document that parses but is
/// not an array yields an empty dataset. Every key of a reply object is kept
/// verbatim, so columns added later can still read their values. Schema
/// columns missing from the reply are filled with an empty string.
pub fn reconcile(raw: &str, schema: &Schema) -> Result<Dataset, ReconciliationError> {
    let value: Value = serde_json::from_str(raw).map_err(|err| {
        tracing::warn!(event = "reconcile_parse_failed", error = %err, raw_bytes = raw.len());
        ReconciliationError::Unparseable(raw.to_string())
    })?;

    let Value::Array(items) = value else {
        tracing::warn!(event = "reconcile_not_array", kind = json_kind(&value));
        return Ok(Dataset::new(schema.clone(), Vec::new()));
    };

    let rows: Vec<Row> = items.iter().map(|item| shape_row(item, schema)).collect();
    tracing::debug!(event = "reconcile_finished", rows = rows.len(), columns = schema.len());
    Ok(Dataset::new(schema.clone(), rows))
}

/// Text shown for a cell value. Null renders as empty; nested values as
/// compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn shape_row(item: &Value, schema: &Schema) -> Row {
    let mut row: Row = match item {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => Row::new(),
    };
    for col in schema {
        if row.get(&col.name).is_none() {
            row.insert(col.name.clone(), Value::String(String::new()));
        }
    }
    row
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tablesmith_core::ColumnDefinition;

    use super::*;

    fn schema(names: &[&str]) -> Schema {
        names
            .iter()
            .map(|name| ColumnDefinition::new(*name, ""))
            .collect()
    }

    #[test]
    fn missing_fields_become_empty() {
        let dataset = reconcile(r#"[{"a":"x"}]"#, &schema(&["a", "b"])).expect("reconcile");
        assert_eq!(dataset.len(), 1);
        let row = &dataset.rows()[0];
        assert_eq!(row.get("a"), Some(&json!("x")));
        assert_eq!(row.get("b"), Some(&json!("")));
    }

    #[test]
    fn keys_outside_the_schema_are_kept() {
        let dataset = reconcile(r#"[{"a":"x","extra":3}]"#, &schema(&["a"])).expect("reconcile");
        let row = &dataset.rows()[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("extra"), Some(&json!(3)));
        assert_eq!(dataset.project(&schema(&["a"])), vec![vec!["x".to_string()]]);
    }

    #[test]
    fn malformed_reply_carries_raw_text() {
        let err = reconcile("not json", &schema(&["a"])).unwrap_err();
        assert_eq!(err.raw(), "not json");
        assert_eq!(err.to_string(), "not json");
    }

    #[test]
    fn fenced_reply_is_not_accepted() {
        let raw = "```json\n[{\"a\":1}]\n```";
        assert!(reconcile(raw, &schema(&["a"])).is_err());
    }

    #[test]
    fn non_array_document_is_zero_rows() {
        let dataset = reconcile(r#"{"a":"x"}"#, &schema(&["a"])).expect("reconcile");
        assert!(dataset.is_empty());
    }

    #[test]
    fn values_are_kept_verbatim() {
        let raw = r#"[{"n": 4.5, "ok": true, "url": "https://img.example/1.png", "none": null}]"#;
        let dataset = reconcile(raw, &schema(&["n", "ok", "url", "none"])).expect("reconcile");
        let row = &dataset.rows()[0];
        assert_eq!(row.get("n"), Some(&json!(4.5)));
        assert_eq!(row.text("ok"), "true");
        assert_eq!(row.text("url"), "https://img.example/1.png");
        assert_eq!(row.text("none"), "");
    }

    #[test]
    fn non_object_elements_yield_empty_rows() {
        let dataset = reconcile(r#"[1, "two"]"#, &schema(&["a"])).expect("reconcile");
        assert_eq!(dataset.project(&schema(&["a"])), vec![vec![String::new()]; 2]);
    }

    #[test]
    fn nested_values_render_as_json() {
        assert_eq!(cell_text(&json!({"k": [1, 2]})), r#"{"k":[1,2]}"#);
    }
}
