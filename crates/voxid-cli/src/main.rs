use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use voxid_core::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "voxid", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Embeddings directory (default: ~/.local/share/voxid/embeddings)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Enroll a speaker from an extracted embedding
    ///
    /// Stores the embedding under the given name, replacing any previous
    /// embedding for that name. The vector file is produced by the speaker
    /// embedding model and may be either:
    ///
    /// - a NumPy `.npy` file holding one float vector (e.g. 192 values)
    /// - a `.json` file holding an array of numbers
    ///
    /// The write is durable before the speaker becomes visible to identify.
    /// On failure the reason says whether the input was bad or storage
    /// failed, so scripts can decide whether to retry.
    Enroll {
        /// Speaker name (also the file name on disk)
        name: String,
        /// Path to the embedding (.npy or .json)
        vector: PathBuf,
    },
    /// Identify the closest enrolled speaker for an embedding
    ///
    /// Prints the best match and its cosine similarity. Scores below the
    /// threshold report "unknown" together with the best score found.
    Identify {
        /// Path to the embedding (.npy or .json)
        vector: PathBuf,
        /// Minimum similarity for a match (default from config, 0.25)
        #[arg(long)]
        threshold: Option<f32>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List enrolled speakers
    List,
    /// Show registry status
    Status,
    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if missing
    Init,
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.dir {
        Some(dir) => Config::load_with_dir(dir),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    init_logging(&config.log_level);
    log::debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Enroll { name, vector } => {
            commands::run_enroll(&config, &name, &vector)?;
        }
        Commands::Identify {
            vector,
            threshold,
            json,
        } => {
            commands::run_identify(&config, &vector, threshold, json)?;
        }
        Commands::List => {
            commands::list_speakers(&config)?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
