use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Standalone document wrapping a circuitikz picture body
pub struct GeneratedDocument {
    text: String,
}

impl GeneratedDocument {
    pub fn new(package_options: &str, source: &str) -> Self {
        let text = format!(
            "\\documentclass{{standalone}}\n\
             \\usepackage{{tikz}}\n\
             \\usepackage[{}]{{circuitikz}}\n\
             \\begin{{document}}\n\
             {}\n\
             \\end{{document}}\n",
            package_options, source
        );
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Write the document to `<dir>/<base_name>.tex`, replacing any existing file
    pub fn write_to(&self, dir: &Path, base_name: &str) -> io::Result<PathBuf> {
        let path = dir.join(format!("{}.tex", base_name));
        fs::write(&path, &self.text)?;
        Ok(path)
    }
}
