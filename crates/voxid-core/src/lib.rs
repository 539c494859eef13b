//! Speaker embedding registry and nearest-match identification engine.
//!
//! Embeddings come from an external speaker model; this crate persists one
//! per enrolled speaker, and resolves a new embedding to the closest known
//! speaker by cosine similarity, or to "unknown" below a threshold.
//! [`Recognizer`] ties the pieces together.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod enroll;
pub mod error;
pub mod extractor;
pub mod identify;
pub mod model;
pub mod recognizer;
pub mod registry;
pub mod similarity;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use extractor::{AudioBuffer, EmbeddingExtractor};
pub use model::{EnrollOutcome, Identification, MatchResult, SpeakerEmbedding, UNKNOWN_SPEAKER};
pub use recognizer::Recognizer;
pub use registry::{Registry, SharedRegistry};
pub use similarity::{
    best_match, cosine_similarity, decide, validate_threshold, DEFAULT_THRESHOLD,
};
pub use store::{FileStore, MemoryStore, VectorStore};
