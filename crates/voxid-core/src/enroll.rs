//! Enrollment: validate an embedding, persist it, then publish it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::model::SpeakerEmbedding;
use crate::registry::SharedRegistry;
use crate::store::VectorStore;

/// Binds an extracted embedding to a speaker name, durably.
///
/// Enrollments of the same name are serialized; different names write to
/// storage concurrently and only contend on the final registry swap. Until
/// the first embedding fixes the dimensionality, all enrollments are
/// serialized.
#[derive(Debug)]
pub struct EnrollmentService {
    store: Arc<dyn VectorStore>,
    registry: Arc<SharedRegistry>,
    name_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    unfixed: Mutex<()>,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn VectorStore>, registry: Arc<SharedRegistry>) -> Self {
        Self {
            store,
            registry,
            name_locks: Mutex::new(HashMap::new()),
            unfixed: Mutex::new(()),
        }
    }

    /// Validate, persist, then publish.
    ///
    /// The record is fsync-durable before the registry changes, so memory
    /// never gets ahead of disk.
    pub fn enroll(&self, name: &str, vector: Vec<f32>) -> Result<SpeakerEmbedding> {
        let embedding = SpeakerEmbedding::new(name, vector)?;
        let _unfixed = self
            .registry
            .snapshot()
            .dimension()
            .is_none()
            .then(|| self.unfixed.lock());

        let lock = self.lock_for(&embedding.name);
        let _guard = lock.lock();

        // Checked under the locks so no record of a losing dimension
        // reaches storage.
        self.registry
            .snapshot()
            .check_dimension(embedding.dimension())?;

        self.store.put(&embedding.name, &embedding.vector)?;
        self.registry
            .update(|registry| registry.upsert(embedding.clone()))?;

        log::info!(
            "Enrolled {} ({} dims)",
            embedding.name,
            embedding.dimension()
        );
        Ok(embedding)
    }

    fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.name_locks.lock();
        Arc::clone(locks.entry(name.to_string()).or_default())
    }
}
