use anyhow::Result;
use voxid_core::{Config, Recognizer};

pub fn show_status(config: &Config) -> Result<()> {
    let recognizer = Recognizer::open(config)?;

    println!("\nVoxid Status\n");
    println!("  Embeddings:  {}", config.embeddings_dir.display());
    println!("  Speakers:    {}", recognizer.count());
    match recognizer.dimension() {
        Some(dim) => println!("  Dimension:   {}", dim),
        None => println!("  Dimension:   <none yet>"),
    }
    println!("  Threshold:   {:.2}", recognizer.threshold());
    println!("  Sample rate: {} Hz", config.sample_rate);

    Ok(())
}
