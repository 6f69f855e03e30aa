use crate::OutputFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Display handle for a rendered diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderArtifact {
    Raster { path: PathBuf },
    Vector { path: PathBuf },
}

impl RenderArtifact {
    pub fn new(format: OutputFormat, path: PathBuf) -> Self {
        match format {
            OutputFormat::Png => Self::Raster { path },
            OutputFormat::Svg => Self::Vector { path },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Raster { path } | Self::Vector { path } => path,
        }
    }

    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Raster { .. } => OutputFormat::Png,
            Self::Vector { .. } => OutputFormat::Svg,
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Raster { .. } => "image/png",
            Self::Vector { .. } => "image/svg+xml",
        }
    }

    /// Pixel size of a raster artifact, read from the file header
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Raster { path } => match image::image_dimensions(path) {
                Ok(dims) => Some(dims),
                Err(e) => {
                    log::debug!("Could not read dimensions of {}: {}", path.display(), e);
                    None
                }
            },
            Self::Vector { .. } => None,
        }
    }

    pub fn summary(&self) -> ArtifactSummary {
        let dims = self.dimensions();
        ArtifactSummary {
            kind: match self {
                Self::Raster { .. } => "raster",
                Self::Vector { .. } => "vector",
            },
            path: self.path().to_path_buf(),
            media_type: self.media_type(),
            width: dims.map(|(w, _)| w),
            height: dims.map(|(_, h)| h),
        }
    }
}

/// JSON-friendly description of an artifact, handed to the host for display
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub kind: &'static str,
    pub path: PathBuf,
    pub media_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}
