use crate::model::Dataset;

/// Single slot holding the last committed dataset.
///
/// Every commit or clear bumps a monotonic version. Commits always overwrite,
/// so concurrent requests resolve as last-writer-wins.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    current: Dataset,
    version: u64,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Dataset {
        &self.current
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn commit(&mut self, dataset: Dataset) -> u64 {
        self.current = dataset;
        self.version += 1;
        self.version
    }

    pub fn clear(&mut self) -> u64 {
        self.current = Dataset::empty();
        self.version += 1;
        self.version
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tablesmith_core::Schema;

    use super::*;
    use crate::model::Row;

    fn dataset(value: &str) -> Dataset {
        let row: Row = [("a", json!(value))].into_iter().collect();
        Dataset::new(Schema::new(), vec![row])
    }

    #[test]
    fn versions_are_monotonic() {
        let mut store = DatasetStore::new();
        assert_eq!(store.version(), 0);
        assert_eq!(store.commit(dataset("x")), 1);
        assert_eq!(store.clear(), 2);
        assert!(store.current().is_empty());
    }

    #[test]
    fn last_commit_wins() {
        let mut store = DatasetStore::new();
        store.commit(dataset("first"));
        store.commit(dataset("second"));
        assert_eq!(store.current().rows()[0].text("a"), "second");
    }
}
