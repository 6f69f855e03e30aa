// Shell-script stand-ins for pdflatex, pdfcrop, convert and pdf2svg.
//
// Each script appends its name and arguments to `calls.log` so tests can check which
// stages ran, and pdflatex copies the `.tex` it was given into the capture directory.
// Scripts run as `sh <script>` so they never need the executable bit.
#![allow(dead_code)]

use circuitikz::Toolchain;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct FakeTools {
    dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        let tools = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        let capture = tools.dir.path().display().to_string();

        let png = tools.dir.path().join("fixture.png");
        image::RgbImage::new(12, 8).save(&png).unwrap();

        tools.script(
            "pdflatex",
            &format!(
                "for last; do :; done\n\
                 base=\"${{last%.tex}}\"\n\
                 cp \"$last\" \"{capture}/captured.tex\"\n\
                 echo '%PDF-1.5 fake' > \"$base.pdf\"\n\
                 touch \"$base.aux\" \"$base.log\""
            ),
        );
        tools.script("pdfcrop", "cp \"$1\" \"$2\"");
        tools.script(
            "convert",
            &format!("for last; do :; done\ncp \"{}\" \"$last\"", png.display()),
        );
        tools.script(
            "pdf2svg",
            concat!(
                "echo '<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"/>'",
                " > \"$2\"",
            ),
        );
        tools.script("failing", "echo 'tool exploded' >&2\nexit 2");
        tools.script("silent", "exit 0");
        tools
    }

    fn script(&self, name: &str, body: &str) {
        let log = self.dir.path().join("calls.log");
        let text = format!(
            "#!/bin/sh\necho \"{} $*\" >> \"{}\"\n{}\n",
            name,
            log.display(),
            body
        );
        fs::write(self.script_path(name), text).unwrap();
    }

    fn script_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{}.sh", name))
    }

    /// Command line running the named fake
    pub fn command(&self, name: &str) -> String {
        format!("sh {}", self.script_path(name).display())
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            pdflatex: self.command("pdflatex"),
            pdfcrop: self.command("pdfcrop"),
            convert: self.command("convert"),
            pdf2svg: self.command("pdf2svg"),
        }
    }

    /// Tool names in the order they ran
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(|l| l.split_whitespace().next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn calls_raw(&self) -> String {
        fs::read_to_string(self.dir.path().join("calls.log")).unwrap_or_default()
    }

    /// The last document handed to pdflatex
    pub fn captured_tex(&self) -> String {
        fs::read_to_string(self.dir.path().join("captured.tex")).unwrap()
    }
}

/// Sorted file names left in `dir`, hidden entries included
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
