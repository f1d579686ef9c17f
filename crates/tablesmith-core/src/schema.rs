use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Description given to columns created without one.
pub const DEFAULT_COLUMN_DESCRIPTION: &str = "Edit description";

/// A named column and the natural-language rule for its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDefinition {
    /// Key the provider must emit for this column.
    #[serde(default)]
    pub name: String,
    /// Free-text description forwarded verbatim into the prompt. May be empty.
    #[serde(default)]
    pub description: String,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Whether the presentation layer should render values as image references.
    pub fn is_image(&self) -> bool {
        self.name.to_lowercase().contains("image")
    }
}

/// Ordered sequence of column definitions.
///
/// Column identity is positional: renaming keeps a column's slot, moving it
/// does not. Names are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<ColumnDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn get(&self, index: usize) -> Option<&ColumnDefinition> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDefinition> {
        self.columns.iter()
    }

    /// Column names in schema order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// Append a column. A name that is empty after trimming is rejected and
    /// the schema is left untouched.
    pub fn add_column(&mut self, name: &str, description: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("column name must not be empty".to_string()));
        }
        self.columns.push(ColumnDefinition::new(name, description));
        Ok(self.columns.len() - 1)
    }

    /// Append a column named `Column_<n>`, where `n` is the new length.
    ///
    /// The generated name may collide with an existing column; that is allowed.
    pub fn add_default_column(&mut self) -> usize {
        let name = format!("Column_{}", self.columns.len() + 1);
        self.columns
            .push(ColumnDefinition::new(name, DEFAULT_COLUMN_DESCRIPTION));
        self.columns.len() - 1
    }

    /// Edit a column in place. An empty trimmed name keeps the previous name
    /// but the description is still applied.
    pub fn update_column(&mut self, index: usize, name: &str, description: &str) -> Result<()> {
        let len = self.columns.len();
        let column = self
            .columns
            .get_mut(index)
            .ok_or(Error::Index { index, len })?;

        let name = name.trim();
        if !name.is_empty() {
            column.name = name.to_string();
        }
        column.description = description.to_string();
        Ok(())
    }

    pub fn remove_column(&mut self, index: usize) -> Result<ColumnDefinition> {
        self.check_index(index)?;
        Ok(self.columns.remove(index))
    }

    /// Move the column at `from` so that it ends up at `to`.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let column = self.columns.remove(from);
        self.columns.insert(to, column);
        Ok(())
    }

    /// Replace every column at once (template or exchange import).
    pub fn replace(&mut self, columns: Vec<ColumnDefinition>) {
        self.columns = columns;
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.columns.len() {
            Ok(())
        } else {
            Err(Error::Index {
                index,
                len: self.columns.len(),
            })
        }
    }
}

impl From<Vec<ColumnDefinition>> for Schema {
    fn from(columns: Vec<ColumnDefinition>) -> Self {
        Self { columns }
    }
}

impl FromIterator<ColumnDefinition> for Schema {
    fn from_iter<I: IntoIterator<Item = ColumnDefinition>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a ColumnDefinition;
    type IntoIter = std::slice::Iter<'a, ColumnDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
