// Library exports for circuitikz

pub mod artifact;
pub mod config;
pub mod logging;
pub mod parser;
pub mod renderer;
pub mod template;
pub mod tool;

pub use artifact::{ArtifactSummary, RenderArtifact};
pub use config::{Config, Toolchain};
pub use parser::{parse_options, parse_options_with_warnings, split_cell, OptionWarning};
pub use renderer::{DiagramRenderer, RenderError};
pub use tool::{Stage, ToolError};

use serde::Deserialize;

pub const DEFAULT_BASE_NAME: &str = "ipynb-circuitikz-output";
pub const DEFAULT_DENSITY: u32 = 100;
pub const DEFAULT_PACKAGE_OPTIONS: &str = "europeanresistors,americaninductors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    /// Raster output through `convert`
    #[serde(rename = "png")]
    #[default]
    Png,
    /// Vector output through `pdfcrop` + `pdf2svg`
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Options for a single render, built fresh from defaults on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_base_name", rename = "filename")]
    pub output_base_name: String,
    #[serde(default = "default_density", rename = "dpi")]
    pub raster_density: u32,
    #[serde(default, rename = "format")]
    pub output_format: OutputFormat,
    #[serde(default = "default_package_options", rename = "options")]
    pub circuitikz_package_options: String,
}

fn default_base_name() -> String {
    DEFAULT_BASE_NAME.to_string()
}

fn default_density() -> u32 {
    DEFAULT_DENSITY
}

fn default_package_options() -> String {
    DEFAULT_PACKAGE_OPTIONS.to_string()
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_base_name: default_base_name(),
            raster_density: DEFAULT_DENSITY,
            output_format: OutputFormat::Png,
            circuitikz_package_options: default_package_options(),
        }
    }
}

impl RenderOptions {
    /// File name of the final artifact, e.g. `diagram.svg`
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{}", self.output_base_name, self.output_format.extension())
    }
}
