use anyhow::{Context, Result};
use std::path::Path;
use voxid_core::store::npy;

/// Read an embedding written by the extraction model.
///
/// `.npy` files are decoded as NumPy arrays; anything else must be a JSON
/// array of numbers.
pub fn read_vector(path: &Path) -> Result<Vec<f32>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let is_npy = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("npy"));

    let vector = if is_npy {
        npy::decode(&bytes).with_context(|| format!("Invalid .npy file {}", path.display()))?
    } else {
        serde_json::from_slice::<Vec<f32>>(&bytes)
            .with_context(|| format!("Expected a JSON array of numbers in {}", path.display()))?
    };

    log::debug!("Read {}-dim vector from {}", vector.len(), path.display());
    Ok(vector)
}
