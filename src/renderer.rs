//! Render pipeline: generated document -> pdflatex -> convert | pdfcrop + pdf2svg.
//!
//! Every invocation works in its own scoped directory under the output directory, so
//! intermediates (`.tex`, `.pdf`, `-tmp.pdf`, `.aux`, `.log`) never collide between runs
//! and are gone once `render` returns, whether it succeeded or not. Only the final
//! `<filename>.png` / `<filename>.svg` is moved into the output directory.

use crate::artifact::RenderArtifact;
use crate::config::Toolchain;
use crate::template::GeneratedDocument;
use crate::parser::OptionWarning;
use crate::tool::{run_tool, tail, Stage, ToolError, TAIL_LINES};
use crate::{OutputFormat, RenderOptions};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid render options: {0}")]
    InvalidOptions(#[from] OptionWarning),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("{stage} stage reported success but did not produce {}", path.display())]
    MissingOutput { stage: Stage, path: PathBuf },
}

/// Files a previous run may have left next to the artifact
const STALE_SUFFIXES: [&str; 7] = [".tex", ".pdf", "-tmp.pdf", ".aux", ".log", ".png", ".svg"];

fn io_error(context: impl Into<String>) -> impl FnOnce(io::Error) -> RenderError {
    let context = context.into();
    move |source| RenderError::Io { context, source }
}

pub struct DiagramRenderer {
    toolchain: Toolchain,
    output_dir: PathBuf,
}

impl DiagramRenderer {
    pub fn new(toolchain: Toolchain, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            toolchain,
            output_dir: output_dir.into(),
        }
    }

    /// Render `source` and return a handle to the final artifact.
    pub fn render(
        &self,
        options: &RenderOptions,
        source: &str,
    ) -> Result<RenderArtifact, RenderError> {
        options.validate()?;
        let base = options.output_base_name.as_str();
        let final_path = self.output_dir.join(options.artifact_file_name());

        fs::create_dir_all(&self.output_dir).map_err(io_error(format!(
            "Failed to create output directory {}",
            self.output_dir.display()
        )))?;

        // A failed run must not leave a previous image (of either format) to be displayed
        for suffix in STALE_SUFFIXES {
            remove_quietly(&self.output_dir.join(format!("{}{}", base, suffix)));
        }

        let workdir = tempfile::Builder::new()
            .prefix(".circuitikz-")
            .tempdir_in(&self.output_dir)
            .map_err(io_error("Failed to create working directory"))?;
        log::debug!("Working directory {}", workdir.path().display());

        let document = GeneratedDocument::new(&options.circuitikz_package_options, source);
        document
            .write_to(workdir.path(), base)
            .map_err(io_error(format!("Failed to write {}.tex", base)))?;

        self.typeset(workdir.path(), base)?;

        let produced = match options.output_format {
            OutputFormat::Png => self.rasterize(workdir.path(), base, options.raster_density)?,
            OutputFormat::Svg => {
                self.crop(workdir.path(), base)?;
                self.vector_convert(workdir.path(), base)?
            }
        };

        fs::rename(&produced, &final_path).map_err(io_error(format!(
            "Failed to move artifact to {}",
            final_path.display()
        )))?;

        if let Err(e) = workdir.close() {
            log::debug!("Could not remove working directory: {}", e);
        }

        log::info!("Rendered {}", final_path.display());
        Ok(RenderArtifact::new(options.output_format, final_path))
    }

    fn typeset(&self, workdir: &Path, base: &str) -> Result<(), RenderError> {
        log::info!("Typesetting {}.tex", base);
        let tex = format!("{}.tex", base);
        let latex_log = workdir.join(format!("{}.log", base));

        let result = run_tool(
            Stage::Typeset,
            &self.toolchain.pdflatex,
            &["-interaction", "batchmode", tex.as_str()],
            workdir,
        )
        .map_err(|err| with_latex_log(err, &latex_log));

        remove_quietly(&workdir.join(format!("{}.aux", base)));
        remove_quietly(&latex_log);

        result?;
        expect_output(Stage::Typeset, workdir.join(format!("{}.pdf", base)))?;
        Ok(())
    }

    fn rasterize(&self, workdir: &Path, base: &str, density: u32) -> Result<PathBuf, RenderError> {
        log::info!("Rasterizing at {} dpi", density);
        let pdf = format!("{}.pdf", base);
        let png = format!("{}.png", base);
        let density = density.to_string();

        run_tool(
            Stage::Rasterize,
            &self.toolchain.convert,
            &["-density", density.as_str(), pdf.as_str(), png.as_str()],
            workdir,
        )?;
        expect_output(Stage::Rasterize, workdir.join(png))
    }

    /// Crop `<base>.pdf` to its bounding box, in place
    fn crop(&self, workdir: &Path, base: &str) -> Result<(), RenderError> {
        log::info!("Cropping {}.pdf", base);
        let pdf = format!("{}.pdf", base);
        let cropped = format!("{}-tmp.pdf", base);

        run_tool(
            Stage::Crop,
            &self.toolchain.pdfcrop,
            &[pdf.as_str(), cropped.as_str()],
            workdir,
        )?;
        let cropped = expect_output(Stage::Crop, workdir.join(cropped))?;

        fs::rename(&cropped, workdir.join(&pdf))
            .map_err(io_error(format!("Failed to replace {} with cropped PDF", pdf)))
    }

    fn vector_convert(&self, workdir: &Path, base: &str) -> Result<PathBuf, RenderError> {
        log::info!("Converting {}.pdf to SVG", base);
        let pdf = format!("{}.pdf", base);
        let svg = format!("{}.svg", base);

        run_tool(
            Stage::VectorConvert,
            &self.toolchain.pdf2svg,
            &[pdf.as_str(), svg.as_str()],
            workdir,
        )?;
        expect_output(Stage::VectorConvert, workdir.join(svg))
    }
}

fn expect_output(stage: Stage, path: PathBuf) -> Result<PathBuf, RenderError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(RenderError::MissingOutput { stage, path })
    }
}

fn remove_quietly(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::debug!("Could not remove {}: {}", path.display(), e),
    }
}

/// pdflatex in batch mode writes its diagnostics to the `.log` file rather than the
/// terminal; swap them in when the captured output carries no error lines.
fn with_latex_log(err: ToolError, log_path: &Path) -> ToolError {
    match err {
        ToolError::Failed { stage, exit_code, stderr_tail } if !has_latex_error(&stderr_tail) => {
            let from_log = fs::read(log_path)
                .map(|bytes| latex_errors(&String::from_utf8_lossy(&bytes)))
                .unwrap_or_default();
            let stderr_tail = if from_log.is_empty() {
                stderr_tail
            } else {
                from_log
            };
            ToolError::Failed {
                stage,
                exit_code,
                stderr_tail,
            }
        }
        other => other,
    }
}

fn has_latex_error(text: &str) -> bool {
    text.lines().any(|l| l.starts_with('!'))
}

/// `!` error lines and their `l.<n>` location lines from a LaTeX log
fn latex_errors(log: &str) -> String {
    let lines: Vec<&str> = log
        .lines()
        .filter(|l| l.starts_with('!') || l.starts_with("l."))
        .collect();
    tail(&lines.join("\n"), TAIL_LINES)
}
