use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_OUTPUT_NAME: &str = "thresholded_image.jpg";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Input settings
    pub input: InputConfig,
    /// Processing parameters
    pub processing: ProcessingConfig,
    /// Batch processing settings
    pub batch: BatchConfig,
    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct InputConfig {
    /// Input image path, directory for batch processing, or `-` for stdin
    pub input: PathBuf,
    /// Write a black placeholder image when the input file does not exist
    pub create_missing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct ProcessingConfig {
    /// Binarization threshold (0-255); gray values above it become white
    pub threshold: i64,
    /// Enable debug logging
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct BatchConfig {
    /// File patterns to include in batch processing
    pub include_patterns: Vec<String>,
    /// File patterns to exclude from batch processing
    pub exclude_patterns: Vec<String>,
    /// Number of parallel workers for batch processing
    pub workers: usize,
    /// Continue batch processing even if some files fail
    pub continue_on_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct OutputConfig {
    /// Output folder for processed files
    pub output_folder: PathBuf,
    /// File name of the result for single-image runs; overwritten on every run
    pub output_name: String,
    /// Persist the binary image
    pub save: bool,
    /// Also write the original and the result side by side
    pub preview: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            input: PathBuf::from("image.jpg"),
            create_missing: false,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        ProcessingConfig {
            threshold: i64::from(bilevel::Threshold::DEFAULT.value()),
            verbose: false,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            include_patterns: vec![
                "*.jpg".to_string(),
                "*.jpeg".to_string(),
                "*.png".to_string(),
            ],
            exclude_patterns: vec![],
            workers: 1,
            continue_on_error: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            output_folder: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            save: true,
            preview: false,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Config> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config: Config = match config_path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&config_str)
                .with_context(|| format!("Invalid JSON config {}", config_path.display()))?,
            Some("toml") => toml::from_str(&config_str)
                .with_context(|| format!("Invalid TOML config {}", config_path.display()))?,
            _ => bail!("Unsupported config file format. Use .json or .toml"),
        };
        Ok(config)
    }

    pub fn save_default(config_path: &Path) -> Result<()> {
        let config = Config::default();
        let config_str = match config_path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(&config)?,
            _ => serde_json::to_string_pretty(&config)?, // Default to JSON
        };

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config {}", config_path.display()))?;
        println!("Generated default configuration file: {}", config_path.display());
        Ok(())
    }
}
