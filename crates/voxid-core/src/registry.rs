//! In-memory speaker registry and its snapshot-swapping shared handle.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::model::SpeakerEmbedding;

/// Insertion-ordered mapping from speaker name to embedding.
///
/// Every entry has the same dimensionality. Overwriting a name keeps the
/// position of its first insertion.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<SpeakerEmbedding>,
    index: HashMap<String, usize>,
    dimension: Option<usize>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry that only accepts vectors of `dimension`.
    #[must_use]
    pub fn with_dimension(dimension: Option<usize>) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    /// Build from loaded records, skipping (and logging) any that are
    /// invalid or disagree with the registry's dimensionality.
    pub fn from_records(
        records: impl IntoIterator<Item = (String, Vec<f32>)>,
        dimension: Option<usize>,
    ) -> Self {
        let mut registry = Self::with_dimension(dimension);
        for (name, vector) in records {
            let inserted = SpeakerEmbedding::new(&name, vector)
                .and_then(|embedding| registry.upsert(embedding));
            if let Err(e) = inserted {
                log::warn!("Skipping stored speaker {}: {}", name, e);
            }
        }
        registry
    }

    /// Dimensionality shared by all entries, once known.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn check_dimension(&self, len: usize) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != len => Err(Error::DimensionMismatch {
                expected,
                actual: len,
            }),
            _ => Ok(()),
        }
    }

    /// Insert or overwrite an entry.
    pub fn upsert(&mut self, embedding: SpeakerEmbedding) -> Result<()> {
        self.check_dimension(embedding.dimension())?;
        self.dimension = Some(embedding.dimension());

        let existing = self.index.get(&embedding.name).copied();
        match existing {
            Some(pos) => self.entries[pos] = embedding,
            None => {
                self.index.insert(embedding.name.clone(), self.entries.len());
                self.entries.push(embedding);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SpeakerEmbedding> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeakerEmbedding> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// `(name, vector)` pairs in insertion order, for
    /// [`best_match`](crate::similarity::best_match).
    pub fn candidates(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.vector.as_slice()))
    }
}

/// Shared handle to the current [`Registry`].
///
/// Readers take an `Arc` snapshot and never block writers for longer than
/// the pointer copy. Writers build the next registry from a copy of the
/// current one and publish it with a single swap, so a snapshot is always
/// either fully before or fully after an update.
#[derive(Debug, Default)]
pub struct SharedRegistry {
    current: RwLock<Arc<Registry>>,
}

impl SharedRegistry {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Registry> {
        Arc::clone(&self.current.read())
    }

    /// Replace the whole registry.
    pub fn replace(&self, registry: Registry) {
        *self.current.write() = Arc::new(registry);
    }

    /// Apply `f` to a copy of the current registry and publish the copy if
    /// `f` succeeds. Updates are serialized.
    pub fn update<T>(&self, f: impl FnOnce(&mut Registry) -> Result<T>) -> Result<T> {
        let mut current = self.current.write();
        let mut next = Registry::clone(&current);
        let out = f(&mut next)?;
        *current = Arc::new(next);
        Ok(out)
    }
}
