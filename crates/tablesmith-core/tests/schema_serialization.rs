use tablesmith_core::{ColumnDefinition, Schema, exchange_json_schema};

#[test]
fn serializes_schema_as_plain_array() {
    let schema: Schema = vec![
        ColumnDefinition::new("id", "Unique product ID"),
        ColumnDefinition::new("in_stock", ""),
    ]
    .into_iter()
    .collect();

    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    let expected = r#"[
  {
    "name": "id",
    "description": "Unique product ID"
  },
  {
    "name": "in_stock",
    "description": ""
  }
]"#;
    assert_eq!(json, expected);
}

#[test]
fn exchange_json_schema_describes_an_array_of_columns() {
    let generated = serde_json::to_value(exchange_json_schema()).expect("serialize json schema");

    assert_eq!(generated.get("type"), Some(&serde_json::json!("array")));
    let properties = generated
        .pointer("/definitions/ColumnDefinition/properties")
        .and_then(|value| value.as_object())
        .expect("column definition properties");
    assert!(properties.contains_key("name"));
    assert!(properties.contains_key("description"));
}
