//! Durable, name-addressed persistence of speaker embeddings.
//!
//! Only this module touches storage. [`FileStore`] keeps one `.npy` file per
//! speaker; [`MemoryStore`] is for tests and ephemeral use.

pub mod file;
pub mod memory;
pub mod npy;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt::Debug;

use crate::error::Result;

/// Name-addressed embedding storage.
///
/// Implementations must be safe for concurrent use and must make each `put`
/// atomic per name: a reader sees the old record or the new one, never a
/// partial write.
pub trait VectorStore: Send + Sync + Debug {
    /// Create or overwrite the record for `name`.
    fn put(&self, name: &str, vector: &[f32]) -> Result<()>;

    /// Fetch one record.
    fn get(&self, name: &str) -> Result<Option<Vec<f32>>>;

    /// Every readable record, ordered by name. Records that cannot be read
    /// or parsed are logged and skipped.
    fn load_all(&self) -> Result<Vec<(String, Vec<f32>)>>;
}
