//! Domain types: embeddings, match results and enrollment outcomes.

pub mod embedding;
pub mod matching;

pub use embedding::{validate_name, validate_vector, SpeakerEmbedding, MAX_NAME_BYTES};
pub use matching::{EnrollOutcome, Identification, MatchResult, UNKNOWN_SPEAKER};
