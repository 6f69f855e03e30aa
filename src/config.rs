use crate::RenderOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Program names (or paths) of the external tools
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    pub pdflatex: String,
    pub pdfcrop: String,
    pub convert: String,
    pub pdf2svg: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            pdflatex: "pdflatex".to_string(),
            pdfcrop: "pdfcrop".to_string(),
            convert: "convert".to_string(),
            pdf2svg: "pdf2svg".to_string(),
        }
    }
}

/// Contents of a `--config` JSON file. Every field is optional.
///
/// ```json
/// {
///   "toolchain": { "convert": "magick" },
///   "defaults": { "dpi": 300, "format": "svg" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub toolchain: Toolchain,
    pub defaults: RenderOptions,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Invalid config JSON")?;
        config
            .defaults
            .validate()
            .context("Invalid default options in config")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to load {}", path.display()))
    }
}
