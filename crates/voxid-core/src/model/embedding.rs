//! Validated speaker embeddings and the name and vector rules behind them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A speaker's voice fingerprint as produced by the embedding model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerEmbedding {
    pub name: String,
    pub vector: Vec<f32>,
}

impl SpeakerEmbedding {
    /// Build a validated embedding. The name is stored trimmed.
    pub fn new(name: &str, vector: Vec<f32>) -> Result<Self> {
        let name = validate_name(name)?;
        validate_vector(&vector)?;
        Ok(Self {
            name: name.to_string(),
            vector,
        })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Longest accepted speaker name in bytes. Leaves room in a 255-byte file
/// name for the `.npy` suffix and the temporary-file decoration.
pub const MAX_NAME_BYTES: usize = 200;

/// Check a speaker name and return its trimmed form.
///
/// Each speaker is persisted as one file named after the speaker, so
/// anything that would escape the embeddings directory is refused.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let reason = if trimmed.is_empty() {
        Some("name is empty")
    } else if trimmed == "." || trimmed == ".." {
        Some("name is a relative path component")
    } else if trimmed.contains(['/', '\\', '\0']) {
        Some("name contains a path separator or NUL byte")
    } else if trimmed.starts_with('.') {
        Some("name starts with '.'")
    } else if trimmed.len() > MAX_NAME_BYTES {
        Some("name is longer than 200 bytes")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(trimmed),
    }
}

/// Check that a vector is usable for cosine comparison.
pub fn validate_vector(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(Error::InvalidVector("vector is empty".to_string()));
    }
    if let Some(idx) = vector.iter().position(|v| !v.is_finite()) {
        return Err(Error::InvalidVector(format!(
            "component {idx} is not finite"
        )));
    }
    if l2_norm(vector) == 0.0 {
        return Err(Error::InvalidVector("vector has zero norm".to_string()));
    }
    Ok(())
}

pub(crate) fn l2_norm(vector: &[f32]) -> f64 {
    vector
        .iter()
        .map(|&v| f64::from(v) * f64::from(v))
        .sum::<f64>()
        .sqrt()
}
