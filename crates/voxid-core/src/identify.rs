//! Identification: resolve an embedding to the closest enrolled speaker.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{validate_vector, MatchResult};
use crate::registry::SharedRegistry;
use crate::similarity::{best_match, decide, validate_threshold};

/// Resolves an embedding to a known speaker or unknown. Read-only.
#[derive(Debug)]
pub struct IdentificationService {
    registry: Arc<SharedRegistry>,
}

impl IdentificationService {
    pub fn new(registry: Arc<SharedRegistry>) -> Self {
        Self { registry }
    }

    /// Best match against one registry snapshot, rejected below `threshold`.
    ///
    /// An empty registry yields `(unknown, 0.0)`. `threshold` must lie in
    /// `[-1, 1]`.
    pub fn identify(&self, vector: &[f32], threshold: f32) -> Result<MatchResult> {
        validate_threshold(threshold)?;
        validate_vector(vector)?;

        let snapshot = self.registry.snapshot();
        if snapshot.is_empty() {
            return Ok(MatchResult::unknown(0.0));
        }
        snapshot.check_dimension(vector.len())?;

        let best = best_match(vector, snapshot.candidates())?;
        let decided = decide(best, threshold);
        log::debug!(
            "Identified {} among {} speakers (threshold {:.2})",
            decided,
            snapshot.len(),
            threshold
        );
        Ok(decided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::registry::Registry;
    use crate::similarity::DEFAULT_THRESHOLD;

    fn service(records: &[(&str, Vec<f32>)]) -> IdentificationService {
        let registry = Registry::from_records(
            records.iter().map(|(n, v)| ((*n).to_string(), v.clone())),
            None,
        );
        IdentificationService::new(Arc::new(SharedRegistry::new(registry)))
    }

    #[test]
    fn test_identify_closest_speaker() {
        let svc = service(&[("alice", vec![1.0, 0.0, 0.0]), ("bob", vec![0.0, 1.0, 0.0])]);
        let result = svc.identify(&[0.9, 0.1, 0.0], DEFAULT_THRESHOLD).unwrap();
        assert_eq!(result.name(), "alice");
        assert!((result.score - 0.994).abs() < 1e-3);
    }

    #[test]
    fn test_identify_orthogonal_is_unknown() {
        let svc = service(&[("alice", vec![1.0, 0.0, 0.0])]);
        let result = svc.identify(&[0.0, 0.0, 1.0], DEFAULT_THRESHOLD).unwrap();
        assert!(result.is_unknown());
        assert!(result.score.abs() < 1e-6);
    }

    #[test]
    fn test_identify_empty_registry() {
        let svc = service(&[]);
        let result = svc.identify(&[1.0, 0.0, 0.0], DEFAULT_THRESHOLD).unwrap();
        assert_eq!(result, MatchResult::unknown(0.0));
    }

    #[test]
    fn test_identify_surfaces_rejected_score() {
        let svc = service(&[("alice", vec![1.0, 0.0])]);
        let result = svc.identify(&[0.6, 0.8], 0.9).unwrap();
        assert!(result.is_unknown());
        assert!((result.score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_identify_rejects_bad_target() {
        let svc = service(&[("alice", vec![1.0, 0.0])]);
        assert!(matches!(
            svc.identify(&[], DEFAULT_THRESHOLD),
            Err(Error::InvalidVector(_))
        ));
        assert!(matches!(
            svc.identify(&[1.0, 0.0, 0.0], DEFAULT_THRESHOLD),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
