//! Identification results and enrollment outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name reported when no enrolled speaker is close enough.
pub const UNKNOWN_SPEAKER: &str = "unknown";

/// The closest speaker found for a target embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// `None` means unknown.
    pub speaker: Option<String>,
    /// Cosine similarity of the best candidate, or `0.0` with no candidates.
    pub score: f32,
}

impl MatchResult {
    #[must_use]
    pub fn unknown(score: f32) -> Self {
        Self {
            speaker: None,
            score,
        }
    }

    #[must_use]
    pub fn known(speaker: impl Into<String>, score: f32) -> Self {
        Self {
            speaker: Some(speaker.into()),
            score,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.speaker.is_none()
    }

    /// The matched name, or [`UNKNOWN_SPEAKER`].
    #[must_use]
    pub fn name(&self) -> &str {
        self.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3})", self.name(), self.score)
    }
}

/// `(name, score)` as handed to a UI or CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub name: String,
    pub score: f32,
}

impl From<MatchResult> for Identification {
    fn from(m: MatchResult) -> Self {
        Self {
            name: m.name().to_string(),
            score: m.score,
        }
    }
}

/// `(success, message)` as handed to a UI or CLI after an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollOutcome {
    pub success: bool,
    pub message: String,
}

impl EnrollOutcome {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
