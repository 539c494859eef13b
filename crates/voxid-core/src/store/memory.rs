//! Volatile store for tests and embedders that persist elsewhere.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::model::{validate_name, validate_vector};

use super::VectorStore;

/// In-memory [`VectorStore`]. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, Vec<f32>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the given records.
    pub fn with_records<'a>(
        records: impl IntoIterator<Item = (&'a str, Vec<f32>)>,
    ) -> Result<Self> {
        let store = Self::new();
        for (name, vector) in records {
            store.put(name, &vector)?;
        }
        Ok(store)
    }
}

impl VectorStore for MemoryStore {
    fn put(&self, name: &str, vector: &[f32]) -> Result<()> {
        let name = validate_name(name)?;
        validate_vector(vector)?;
        self.records.write().insert(name.to_string(), vector.to_vec());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<Vec<f32>>> {
        Ok(self.records.read().get(validate_name(name)?).cloned())
    }

    fn load_all(&self) -> Result<Vec<(String, Vec<f32>)>> {
        Ok(self
            .records
            .read()
            .iter()
            .map(|(name, vector)| (name.clone(), vector.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_upsert() {
        let store = MemoryStore::new();
        store.put("alice", &[1.0, 0.0]).unwrap();
        store.put("alice", &[0.5, 0.5]).unwrap();

        assert_eq!(store.get("alice").unwrap(), Some(vec![0.5, 0.5]));
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_memory_store_load_all_sorted() {
        let store =
            MemoryStore::with_records([("bob", vec![0.0, 1.0]), ("alice", vec![1.0, 0.0])])
                .unwrap();
        let names: Vec<String> = store.load_all().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alice".to_string(), "bob".to_string()]);
    }
}
