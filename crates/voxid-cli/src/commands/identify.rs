use anyhow::{Context, Result};
use std::path::Path;
use voxid_core::{validate_threshold, Config, Recognizer};

use super::vector_file::read_vector;

pub fn run_identify(
    config: &Config,
    vector_path: &Path,
    threshold: Option<f32>,
    json: bool,
) -> Result<()> {
    let threshold = threshold.unwrap_or(config.threshold);
    validate_threshold(threshold).context("Invalid --threshold")?;

    let vector = read_vector(vector_path)?;
    let recognizer = Recognizer::open(config).context("Failed to open embeddings directory")?;

    if recognizer.count() == 0 {
        log::warn!("No speakers enrolled in {}", config.embeddings_dir.display());
    }

    let result = recognizer
        .identify(&vector, threshold)
        .context("Identification failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Speaker: {}", result.name);
        println!("Score:   {:.4} (threshold {:.2})", result.score, threshold);
    }

    Ok(())
}
