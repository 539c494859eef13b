//! Contract for the external speaker-embedding model.
//!
//! Capture and extraction live outside this crate. Adapters implement
//! [`EmbeddingExtractor`] over whatever model they load; the core only
//! validates the buffer it hands over and the vector it gets back.

use std::fmt::Debug;

use crate::error::{Error, Result};

/// Sample rate the stock ECAPA-TDNN speaker models expect.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM samples in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Check the buffer against what an extractor expects.
    pub fn validate(&self, expected_rate: u32) -> Result<()> {
        if self.samples.is_empty() {
            return Err(Error::InvalidAudio("buffer is empty".to_string()));
        }
        if self.sample_rate != expected_rate {
            return Err(Error::InvalidAudio(format!(
                "sample rate {} Hz, extractor expects {} Hz",
                self.sample_rate, expected_rate
            )));
        }
        Ok(())
    }
}

/// Turns a mono buffer into a fixed-length embedding.
pub trait EmbeddingExtractor: Send + Sync + Debug {
    /// Sample rate the model was trained on.
    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    /// Run the model. Failures should be reported as [`Error::Extraction`].
    fn extract(&self, audio: &AudioBuffer) -> Result<Vec<f32>>;
}

/// Validate `audio`, run `extractor`, and return its vector.
pub fn extract_embedding(
    extractor: &dyn EmbeddingExtractor,
    audio: &AudioBuffer,
) -> Result<Vec<f32>> {
    audio.validate(extractor.sample_rate())?;
    log::debug!(
        "Extracting embedding from {:.2}s of audio",
        audio.duration_secs()
    );
    extractor.extract(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FailingExtractor;

    impl EmbeddingExtractor for FailingExtractor {
        fn extract(&self, _audio: &AudioBuffer) -> Result<Vec<f32>> {
            Err(Error::Extraction("model not loaded".to_string()))
        }
    }

    #[test]
    fn test_buffer_duration() {
        let audio = AudioBuffer::new(vec![0.0; 8_000], DEFAULT_SAMPLE_RATE);
        assert!((audio.duration_secs() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_buffer() {
        assert!(AudioBuffer::new(vec![0.1; 10], 16_000).validate(16_000).is_ok());
        assert!(matches!(
            AudioBuffer::new(vec![], 16_000).validate(16_000),
            Err(Error::InvalidAudio(_))
        ));
        assert!(matches!(
            AudioBuffer::new(vec![0.1; 10], 44_100).validate(16_000),
            Err(Error::InvalidAudio(_))
        ));
    }

    #[test]
    fn test_extraction_failure_propagates() {
        let audio = AudioBuffer::new(vec![0.1; 10], DEFAULT_SAMPLE_RATE);
        assert!(matches!(
            extract_embedding(&FailingExtractor, &audio),
            Err(Error::Extraction(_))
        ));
    }
}
