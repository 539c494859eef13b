use anyhow::Result;
use voxid_core::config::{self, Config};

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    let path = config::config_file_path();
    println!("Config file: {}", path.display());
    println!(
        "File exists: {}\n",
        if path.exists() { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  embeddings_dir: {}", config.embeddings_dir.display());
    println!("  threshold: {}", config.threshold);
    match config.expected_dimension {
        Some(dim) => println!("  expected_dimension: {}", dim),
        None => println!("  expected_dimension: <not set>"),
    }
    println!("  sample_rate: {}", config.sample_rate);
    println!("  log_level: {}", config.log_level);

    println!("\nPriority: CLI args > ENV vars (VOXID_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure voxid.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
