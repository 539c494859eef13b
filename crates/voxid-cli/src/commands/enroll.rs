use anyhow::{Context, Result};
use std::path::Path;
use voxid_core::{Config, Recognizer};

use super::vector_file::read_vector;

pub fn run_enroll(config: &Config, name: &str, vector_path: &Path) -> Result<()> {
    log::info!("Enrolling {} from {}", name, vector_path.display());

    let vector = read_vector(vector_path)?;
    let recognizer = Recognizer::open(config).context("Failed to open embeddings directory")?;

    let outcome = recognizer.enroll(name, vector);
    if !outcome.success {
        anyhow::bail!("{}", outcome.message);
    }

    println!("✓ {}", outcome.message);
    println!("  Known speakers: {}", recognizer.count());
    Ok(())
}
