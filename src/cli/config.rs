//! TOML configuration file support.
//!
//! Settings shared by every conversion can live in a config file instead of
//! being repeated on the command line:
//!
//! ```toml
//! # dsg-convert.toml
//! [conversion]
//! format = "cdf5"
//! fallback_feature_id = "glider42"
//! delimiter = ";"
//! header_lines = 2
//! output_dir = "out"
//! ```
//!
//! Command-line flags win over config values.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use dsgconvert::encoder::EncoderConfig;
use dsgconvert::ncfile::FileFormat;
use dsgconvert::table::TableReadOptions;

/// Root configuration structure for dsg-convert.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion-specific settings.
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Configuration for the convert and matchup commands.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionConfig {
    /// Output format: "classic" or "cdf5".
    pub format: Option<FileFormat>,

    /// Feature identifier used when the template has none.
    pub fallback_feature_id: Option<String>,

    /// Single-character field delimiter.
    pub delimiter: Option<String>,

    /// Number of header lines in the input table.
    pub header_lines: Option<usize>,

    /// Directory receiving output files.
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file when a path is given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Command-line values that override the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub format: Option<FileFormat>,
    pub fallback_feature_id: Option<String>,
    pub delimiter: Option<String>,
    pub header_lines: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved settings for one run
#[derive(Debug)]
pub struct Settings {
    pub encoder: EncoderConfig,
    pub table: TableReadOptions,
    pub output_dir: PathBuf,
}

impl ConversionConfig {
    /// Merge with command-line overrides. `default_dir` is used when neither
    /// side names an output directory.
    pub fn resolve(self, overrides: Overrides, default_dir: &Path) -> Result<Settings> {
        let mut encoder = EncoderConfig::default();
        if let Some(format) = overrides.format.or(self.format) {
            encoder.format = format;
        }
        if let Some(id) = overrides.fallback_feature_id.or(self.fallback_feature_id) {
            encoder.fallback_feature_id = id;
        }

        let mut table = TableReadOptions::default();
        if let Some(delimiter) = overrides.delimiter.or(self.delimiter) {
            table.delimiter = parse_delimiter(&delimiter)?;
        }
        if let Some(lines) = overrides.header_lines.or(self.header_lines) {
            table.header_lines = lines;
        }

        let output_dir = overrides
            .output_dir
            .or(self.output_dir)
            .unwrap_or_else(|| default_dir.to_path_buf());

        Ok(Settings {
            encoder,
            table,
            output_dir,
        })
    }
}

/// Accepts a single ASCII character or the names `tab`, `comma`, `semicolon`
pub fn parse_delimiter(text: &str) -> Result<u8> {
    match text {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        _ => match text.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => bail!("Delimiter must be a single ASCII character, got '{}'", text),
        },
    }
}
