use anyhow::Result;
use voxid_core::{Config, Recognizer};

pub fn list_speakers(config: &Config) -> Result<()> {
    let recognizer = Recognizer::open(config)?;
    let speakers = recognizer.list_known_speakers();

    if speakers.is_empty() {
        println!("No speakers enrolled");
        println!("\n  Run `voxid enroll <name> <vector-file>` to add one");
        return Ok(());
    }

    for name in &speakers {
        println!("{}", name);
    }
    Ok(())
}
