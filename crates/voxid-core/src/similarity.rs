//! Cosine scoring, best-match selection and the accept/reject decision.

use crate::error::{Error, Result};
use crate::model::MatchResult;

/// Minimum similarity accepted as a match unless configured otherwise.
pub const DEFAULT_THRESHOLD: f32 = 0.25;

/// Cosine similarity of two equal-length vectors, in `[-1, 1]`.
///
/// Accumulates in f64. Fails with [`Error::DimensionMismatch`] when the
/// lengths differ and [`Error::DegenerateVector`] when either norm is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(Error::DegenerateVector);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(similarity.clamp(-1.0, 1.0) as f32)
}

/// Highest-scoring candidate for `target`.
///
/// Candidates are visited in iteration order and only a strictly greater
/// score replaces the current best, so the first-seen candidate wins ties.
/// No candidates yields `(unknown, 0.0)`. A degenerate candidate is skipped;
/// a dimensionality mismatch aborts the search.
pub fn best_match<'a, I>(target: &[f32], candidates: I) -> Result<MatchResult>
where
    I: IntoIterator<Item = (&'a str, &'a [f32])>,
{
    let mut best: Option<(&str, f32)> = None;

    for (name, vector) in candidates {
        let score = match cosine_similarity(target, vector) {
            Ok(score) => score,
            Err(Error::DegenerateVector) => {
                log::warn!("Skipping degenerate embedding for {}", name);
                continue;
            }
            Err(e) => return Err(e),
        };
        log::debug!("score {} = {:.4}", name, score);

        if best.map_or(true, |(_, top)| score > top) {
            best = Some((name, score));
        }
    }

    Ok(match best {
        Some((name, score)) => MatchResult::known(name, score),
        None => MatchResult::unknown(0.0),
    })
}

/// Check that `threshold` is a cosine score in `[-1, 1]`. NaN is rejected.
pub fn validate_threshold(threshold: f32) -> Result<()> {
    if (-1.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(Error::InvalidThreshold(threshold))
    }
}

/// Reject matches scoring below `threshold`, keeping the raw score.
pub fn decide(result: MatchResult, threshold: f32) -> MatchResult {
    if result.score < threshold {
        MatchResult::unknown(result.score)
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-6;

    fn candidates<'a>(entries: &'a [(&'a str, Vec<f32>)]) -> Vec<(&'a str, &'a [f32])> {
        entries.iter().map(|(n, v)| (*n, v.as_slice())).collect()
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.25).is_ok());
        assert!(validate_threshold(-1.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(f32::NAN).is_err());
    }

    #[test]
    fn test_cosine_identical() {
        for v in [vec![1.0, 2.0, 3.0], vec![-0.3, 0.0, 7.5, 1e-3], vec![42.0]] {
            let s = cosine_similarity(&v, &v).unwrap();
            assert!((s - 1.0).abs() < TOLERANCE, "got {s}");
        }
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = [0.6, 0.8, 0.0];
        let b = [0.0, 0.6, 0.8];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < TOLERANCE);
        assert!((ab - 0.48).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_orthogonal_and_opposite() {
        let s = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(s.abs() < TOLERANCE);
        let s = cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]).unwrap();
        assert!((s + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert!(matches!(
            cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert!(matches!(
            cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]),
            Err(Error::DegenerateVector)
        ));
    }

    #[test]
    fn test_best_match_empty() {
        let result = best_match(&[1.0, 0.0, 0.0], Vec::<(&str, &[f32])>::new()).unwrap();
        assert_eq!(result, MatchResult::unknown(0.0));
    }

    #[test]
    fn test_best_match_picks_highest() {
        let entries = [
            ("alice", vec![1.0, 0.0, 0.0]),
            ("bob", vec![0.0, 1.0, 0.0]),
        ];
        let result = best_match(&[0.9, 0.1, 0.0], candidates(&entries)).unwrap();
        assert_eq!(result.name(), "alice");
        assert!((result.score - 0.993_883_7).abs() < 1e-5);
    }

    #[test]
    fn test_best_match_tie_goes_to_first() {
        let entries = [
            ("first", vec![1.0, 1.0]),
            ("second", vec![2.0, 2.0]),
            ("third", vec![1.0, 1.0]),
        ];
        for _ in 0..10 {
            let result = best_match(&[3.0, 3.0], candidates(&entries)).unwrap();
            assert_eq!(result.name(), "first");
        }
    }

    #[test]
    fn test_best_match_keeps_negative_best() {
        let entries = [("alice", vec![-1.0, 0.0])];
        let result = best_match(&[1.0, 0.0], candidates(&entries)).unwrap();
        assert_eq!(result.name(), "alice");
        assert!((result.score + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_best_match_skips_degenerate_candidate() {
        let entries = [("ghost", vec![0.0, 0.0]), ("alice", vec![1.0, 0.0])];
        let result = best_match(&[1.0, 0.0], candidates(&entries)).unwrap();
        assert_eq!(result.name(), "alice");

        let entries = [("ghost", vec![0.0, 0.0])];
        let result = best_match(&[1.0, 0.0], candidates(&entries)).unwrap();
        assert_eq!(result, MatchResult::unknown(0.0));
    }

    #[test]
    fn test_best_match_dimension_mismatch_fails_fast() {
        let entries = [("alice", vec![1.0, 0.0])];
        assert!(matches!(
            best_match(&[1.0, 0.0, 0.0], candidates(&entries)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_decide_threshold() {
        let accepted = decide(MatchResult::known("alice", 0.25), DEFAULT_THRESHOLD);
        assert_eq!(accepted.name(), "alice");

        let rejected = decide(MatchResult::known("alice", 0.2), DEFAULT_THRESHOLD);
        assert!(rejected.is_unknown());
        assert!((rejected.score - 0.2).abs() < TOLERANCE);
    }
}
