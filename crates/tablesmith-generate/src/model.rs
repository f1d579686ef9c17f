use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tablesmith_core::{Schema, redact_api_key};
use tablesmith_providers::ProviderKind;

use crate::compiler::{Quantity, compile};
use crate::reconcile::cell_text;

/// Immutable description of one generation attempt.
///
/// The schema is a value snapshot taken at dispatch time, so later edits to
/// the live schema never reach an in-flight request.
#[derive(Clone, PartialEq)]
pub struct GenerationRequest {
    schema: Schema,
    quantity: Quantity,
    provider: ProviderKind,
    api_key: String,
    prompt: String,
}

impl GenerationRequest {
    pub fn new(
        schema: Schema,
        quantity: Quantity,
        provider: ProviderKind,
        api_key: impl Into<String>,
    ) -> Self {
        let prompt = compile(&schema, quantity);
        Self {
            schema,
            quantity,
            provider,
            api_key: api_key.into(),
            prompt,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The compiled instruction for this request's schema snapshot.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("schema", &self.schema)
            .field("quantity", &self.quantity)
            .field("provider", &self.provider)
            .field("api_key", &redact_api_key(&self.api_key))
            .finish_non_exhaustive()
    }
}

/// One generated record, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Display text for `column`; absent columns render as an empty string.
    pub fn text(&self, column: &str) -> String {
        self.values.get(column).map(cell_text).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        }
    }
}

/// Ordered rows plus the schema snapshot they were generated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    source: Schema,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(source: Schema, rows: Vec<Row>) -> Self {
        Self { source, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Retag the rows with the schema snapshot of the request that produced them.
    pub fn with_source(mut self, source: Schema) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> &Schema {
        &self.source
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text for every row, projected onto `schema`.
    ///
    /// Columns added after generation read whatever the reply carried under
    /// their name, or empty when it carried nothing. Removed columns are
    /// dropped from the output but their values stay in the rows.
    pub fn project(&self, schema: &Schema) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| schema.iter().map(|col| row.text(&col.name)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tablesmith_core::ColumnDefinition;

    use super::*;

    #[test]
    fn request_debug_redacts_key() {
        let request = GenerationRequest::new(
            Schema::new(),
            Quantity::new(3),
            ProviderKind::Cerebras,
            "csk-secret-value-1234",
        );
        let debug = format!("{request:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("***1234"));
    }

    #[test]
    fn projection_follows_live_schema() {
        let row: Row = [("a", json!("x")), ("b", json!(2))].into_iter().collect();
        let dataset = Dataset::new(Schema::new(), vec![row]);

        let live: Schema = vec![
            ColumnDefinition::new("b", ""),
            ColumnDefinition::new("c", ""),
        ]
        .into_iter()
        .collect();

        assert_eq!(dataset.project(&live), vec![vec!["2".to_string(), String::new()]]);
    }
}
