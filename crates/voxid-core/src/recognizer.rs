//! The public face of the engine: one owned registry, one store, and the
//! enrollment and identification services that share them.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::Config;
use crate::enroll::EnrollmentService;
use crate::error::{Error, Result};
use crate::extractor::{extract_embedding, AudioBuffer, EmbeddingExtractor};
use crate::identify::IdentificationService;
use crate::model::{EnrollOutcome, Identification, SpeakerEmbedding};
use crate::registry::{Registry, SharedRegistry};
use crate::store::{FileStore, VectorStore};

/// Speaker enrollment and identification over a durable registry.
///
/// All methods are plain synchronous calls and `Recognizer` is `Sync`, so
/// an adapter may share it across whatever worker threads it runs.
#[derive(Debug)]
pub struct Recognizer {
    store: Arc<dyn VectorStore>,
    registry: Arc<SharedRegistry>,
    enrollment: EnrollmentService,
    identification: IdentificationService,
    threshold: f32,
    expected_dimension: Option<usize>,
    sample_rate: u32,
}

impl Recognizer {
    /// Open the embeddings directory from `config` and load every record.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = FileStore::open(&config.embeddings_dir)?;
        Self::with_store(Arc::new(store), config)
    }

    /// Build on an arbitrary store and load every record from it.
    pub fn with_store(store: Arc<dyn VectorStore>, config: &Config) -> Result<Self> {
        let registry = Arc::new(SharedRegistry::default());
        let recognizer = Self {
            enrollment: EnrollmentService::new(Arc::clone(&store), Arc::clone(&registry)),
            identification: IdentificationService::new(Arc::clone(&registry)),
            store,
            registry,
            threshold: config.threshold,
            expected_dimension: config.expected_dimension,
            sample_rate: config.sample_rate,
        };
        recognizer.reload()?;
        Ok(recognizer)
    }

    /// Rescan durable storage and swap in the result. Returns the number of
    /// speakers loaded.
    pub fn reload(&self) -> Result<usize> {
        let records = self.store.load_all()?;
        let registry = Registry::from_records(records, self.expected_dimension);
        let count = registry.len();
        self.registry.replace(registry);
        log::info!("{} speakers loaded", count);
        Ok(count)
    }

    /// Enroll and report `(success, message)`. The message tells bad input
    /// apart from storage failure.
    pub fn enroll(&self, name: &str, vector: Vec<f32>) -> EnrollOutcome {
        match self.try_enroll(name, vector) {
            Ok(embedding) => EnrollOutcome::ok(format!("Enrolled {}.", embedding.name)),
            Err(e) => {
                log::warn!("Enrollment of {:?} failed: {}", name, e);
                EnrollOutcome::failed(describe_failure(&e))
            }
        }
    }

    /// Enroll with a typed error.
    pub fn try_enroll(&self, name: &str, vector: Vec<f32>) -> Result<SpeakerEmbedding> {
        self.enrollment.enroll(name, vector)
    }

    /// Identify against the current registry using `threshold`.
    pub fn identify(&self, vector: &[f32], threshold: f32) -> Result<Identification> {
        self.identification
            .identify(vector, threshold)
            .map(Identification::from)
    }

    /// Identify using the configured threshold.
    pub fn identify_default(&self, vector: &[f32]) -> Result<Identification> {
        self.identify(vector, self.threshold)
    }

    /// Extract an embedding from `audio` and enroll it under `name`.
    pub fn enroll_sample(
        &self,
        name: &str,
        extractor: &dyn EmbeddingExtractor,
        audio: &AudioBuffer,
    ) -> EnrollOutcome {
        match self.extract(extractor, audio) {
            Ok(vector) => self.enroll(name, vector),
            Err(e) => EnrollOutcome::failed(describe_failure(&e)),
        }
    }

    /// Extract an embedding from `audio` and identify it.
    pub fn identify_sample(
        &self,
        extractor: &dyn EmbeddingExtractor,
        audio: &AudioBuffer,
        threshold: f32,
    ) -> Result<Identification> {
        let vector = self.extract(extractor, audio)?;
        self.identify(&vector, threshold)
    }

    /// Run `extractor` after checking it was built for the configured
    /// sample rate.
    fn extract(&self, extractor: &dyn EmbeddingExtractor, audio: &AudioBuffer) -> Result<Vec<f32>> {
        if extractor.sample_rate() != self.sample_rate {
            return Err(Error::Config(format!(
                "extractor expects {} Hz but sample_rate is configured as {} Hz",
                extractor.sample_rate(),
                self.sample_rate
            )));
        }
        extract_embedding(extractor, audio)
    }

    pub fn list_known_speakers(&self) -> BTreeSet<String> {
        self.registry.snapshot().names().map(str::to_string).collect()
    }

    pub fn count(&self) -> usize {
        self.registry.snapshot().len()
    }

    pub fn get(&self, name: &str) -> Option<Vec<f32>> {
        self.registry
            .snapshot()
            .get(name.trim())
            .map(|e| e.vector.clone())
    }

    /// Dimensionality of the stored embeddings, once known.
    pub fn dimension(&self) -> Option<usize> {
        self.registry.snapshot().dimension()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Sample rate extractors must be built for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn describe_failure(e: &Error) -> String {
    if e.is_storage_error() {
        format!("Storage failure, try again: {e}")
    } else if e.is_input_error() {
        format!("Invalid input: {e}")
    } else {
        format!("Enrollment failed: {e}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[derive(Debug)]
    struct FixedExtractor(Vec<f32>);

    impl EmbeddingExtractor for FixedExtractor {
        fn extract(&self, _audio: &AudioBuffer) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    fn recognizer() -> Recognizer {
        Recognizer::with_store(Arc::new(MemoryStore::new()), &Config::default()).unwrap()
    }

    #[test]
    fn test_enroll_outcome_messages() {
        let rec = recognizer();

        let ok = rec.enroll("alice", vec![1.0, 0.0, 0.0]);
        assert!(ok.success);
        assert!(ok.message.contains("alice"));

        let bad = rec.enroll("  ", vec![1.0, 0.0, 0.0]);
        assert!(!bad.success);
        assert!(bad.message.starts_with("Invalid input"));

        let bad = rec.enroll("carol", vec![]);
        assert!(!bad.success);
        assert!(bad.message.starts_with("Invalid input"));
    }

    #[test]
    fn test_list_and_count() {
        let rec = recognizer();
        assert_eq!(rec.count(), 0);
        assert!(rec.enroll("bob", vec![0.0, 1.0]).success);
        assert!(rec.enroll("alice", vec![1.0, 0.0]).success);
        assert!(rec.enroll("alice", vec![0.9, 0.1]).success);

        assert_eq!(rec.count(), 2);
        let names: Vec<String> = rec.list_known_speakers().into_iter().collect();
        assert_eq!(names, vec!["alice".to_string(), "bob".to_string()]);
        assert_eq!(rec.get("alice"), Some(vec![0.9, 0.1]));
        assert_eq!(rec.dimension(), Some(2));
    }

    #[test]
    fn test_identify_default_threshold() {
        let rec = recognizer();
        assert!(rec.enroll("alice", vec![1.0, 0.0]).success);

        let id = rec.identify_default(&[0.2, 1.0]).unwrap();
        assert_eq!(id.name, "unknown");
        assert!(id.score > 0.0 && id.score < rec.threshold());
    }

    #[test]
    fn test_sample_round_trip_through_extractor() {
        let rec = recognizer();
        let audio = AudioBuffer::new(vec![0.01; 16_000], 16_000);

        let outcome = rec.enroll_sample("alice", &FixedExtractor(vec![0.3, 0.4]), &audio);
        assert!(outcome.success, "{}", outcome.message);

        let id = rec
            .identify_sample(&FixedExtractor(vec![0.6, 0.8]), &audio, 0.25)
            .unwrap();
        assert_eq!(id.name, "alice");
        assert!((id.score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_with_wrong_rate_is_rejected() {
        let rec = recognizer();
        let audio = AudioBuffer::new(vec![0.01; 100], 8_000);
        let outcome = rec.enroll_sample("alice", &FixedExtractor(vec![1.0]), &audio);
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Invalid input"));
        assert_eq!(rec.count(), 0);
    }

    #[derive(Debug)]
    struct WidebandExtractor;

    impl EmbeddingExtractor for WidebandExtractor {
        fn sample_rate(&self) -> u32 {
            48_000
        }

        fn extract(&self, _audio: &AudioBuffer) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    #[test]
    fn test_extractor_must_match_configured_rate() {
        let rec = recognizer();
        assert_eq!(rec.sample_rate(), 16_000);
        let audio = AudioBuffer::new(vec![0.01; 48_000], 48_000);

        let outcome = rec.enroll_sample("alice", &WidebandExtractor, &audio);
        assert!(!outcome.success);
        assert!(outcome.message.contains("48000 Hz"), "{}", outcome.message);
        assert!(matches!(
            rec.identify_sample(&WidebandExtractor, &audio, 0.25),
            Err(Error::Config(_))
        ));

        let config = Config {
            sample_rate: 48_000,
            ..Config::default()
        };
        let rec = Recognizer::with_store(Arc::new(MemoryStore::new()), &config).unwrap();
        let outcome = rec.enroll_sample("alice", &WidebandExtractor, &audio);
        assert!(outcome.success, "{}", outcome.message);
    }

    #[test]
    fn test_identify_rejects_bad_threshold() {
        let rec = recognizer();
        assert!(rec.enroll("alice", vec![1.0, 0.0]).success);

        for threshold in [f32::NAN, 1.5, -2.0] {
            let err = rec.identify(&[0.0, 1.0], threshold).unwrap_err();
            assert!(matches!(err, Error::InvalidThreshold(_)));
            assert!(err.is_input_error());
        }
    }

    #[test]
    fn test_expected_dimension_is_enforced() {
        let config = Config {
            expected_dimension: Some(3),
            ..Config::default()
        };
        let rec = Recognizer::with_store(Arc::new(MemoryStore::new()), &config).unwrap();
        assert!(!rec.enroll("alice", vec![1.0, 0.0]).success);
        assert!(rec.enroll("alice", vec![1.0, 0.0, 0.0]).success);
    }
}
