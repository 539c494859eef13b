//! Layered configuration: defaults, then `config.toml`, then `VOXID_*`
//! environment variables.

use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::extractor::DEFAULT_SAMPLE_RATE;
use crate::similarity::{validate_threshold, DEFAULT_THRESHOLD};

/// Configuration for voxid.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (VOXID_* prefix)
/// 3. Config file (~/.config/voxid/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one `<speaker>.npy` file per enrolled speaker.
    ///
    /// Can be set via:
    /// - CLI: --dir /path/to/embeddings
    /// - ENV: VOXID_EMBEDDINGS_DIR
    /// - Config: embeddings_dir = "/path/to/embeddings"
    /// - Default: ~/.local/share/voxid/embeddings
    pub embeddings_dir: PathBuf,

    /// Minimum cosine similarity accepted as a match.
    pub threshold: f32,

    /// Embedding size the model produces (192 for ECAPA-TDNN). When unset,
    /// the first stored embedding fixes it.
    pub expected_dimension: Option<usize>,

    /// Sample rate the embedding extractor must be built for.
    pub sample_rate: u32,

    /// Log level for the CLI (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embeddings_dir: default_embeddings_dir(),
            threshold: DEFAULT_THRESHOLD,
            expected_dimension: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            log_level: String::from("info"),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/voxid/config.toml
    /// Reads environment variables with VOXID_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the resulting values are out of range.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().map_err(|e| config_error("create builder", e))?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| Error::Config("config path contains invalid UTF-8".to_string()))?;
            builder
                .add_file(path_str)
                .map_err(|e| config_error("load config file", e))?;
        }

        let env_opts = env::Options::with_top_level("voxid");
        builder
            .add_env(env_opts)
            .map_err(|e| config_error("load environment variables", e))?;

        let config: Self = builder
            .build()
            .map_err(|e| config_error("build configuration", e))?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration with a custom embeddings directory.
    ///
    /// This is used when the --dir CLI flag is provided.
    pub fn load_with_dir(dir: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.embeddings_dir = dir;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold).map_err(|e| Error::Config(e.to_string()))?;
        if self.expected_dimension == Some(0) {
            return Err(Error::Config(
                "expected_dimension must be positive".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(Error::Config("sample_rate must be positive".to_string()));
        }
        Ok(())
    }
}

fn config_error(action: &str, e: impl std::fmt::Display) -> Error {
    Error::Config(format!("failed to {action}: {e}"))
}

/// Get the default embeddings directory.
///
/// Returns: ~/.local/share/voxid/embeddings (or platform equivalent)
fn default_embeddings_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voxid")
        .join("embeddings")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/voxid/config.toml
/// - macOS: ~/Library/Application Support/voxid/config.toml
/// - Windows: %APPDATA%\voxid\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voxid")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Voxid Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (VOXID_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Directory holding one <speaker>.npy embedding per enrolled speaker
#
# Can also be set via:
# - CLI: voxid --dir /custom/embeddings list
# - Environment: VOXID_EMBEDDINGS_DIR=/custom/embeddings
#
# Default: Platform-specific data directory
#embeddings_dir = "/path/to/embeddings"

# Minimum cosine similarity for a match; lower scores report "unknown"
threshold = 0.25

# Embedding size produced by the model (192 for ECAPA-TDNN on VoxCeleb)
#expected_dimension = 192

# Sample rate expected by the embedding model
sample_rate = 16000

# Log level: error, warn, info, debug, trace (RUST_LOG overrides)
log_level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::storage(parent, e))?;
    }

    std::fs::write(&config_path, example_config())
        .map_err(|e| Error::storage(&config_path, e))?;

    Ok(true)
}
