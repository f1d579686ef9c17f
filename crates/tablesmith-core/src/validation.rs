use crate::error::{Error, Result};
use crate::schema::Schema;

/// Check that a schema can be sent to a provider.
///
/// Only emptiness is checked: blank or duplicate names are accepted here.
pub fn validate_for_generation(schema: &Schema) -> Result<()> {
    if schema.is_empty() {
        return Err(Error::Validation(
            "add columns before generating data".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDefinition;

    #[test]
    fn empty_schema_is_rejected() {
        assert!(matches!(
            validate_for_generation(&Schema::new()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let schema: Schema = vec![
            ColumnDefinition::new("id", "first"),
            ColumnDefinition::new("id", "second"),
        ]
        .into_iter()
        .collect();
        assert!(validate_for_generation(&schema).is_ok());
    }
}
