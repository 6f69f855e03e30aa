//! Uniform wrapper around the external LaTeX toolchain.
//!
//! Every pipeline stage goes through [`run_tool`], which runs the program to completion,
//! checks its exit status and keeps the tail of its error output for reporting.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Lines of tool output kept when a stage fails
pub const TAIL_LINES: usize = 20;

/// Pipeline stage an external tool runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// `pdflatex`
    Typeset,
    /// `pdfcrop`
    Crop,
    /// `convert`
    Rasterize,
    /// `pdf2svg`
    VectorConvert,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Typeset => "typeset",
            Stage::Crop => "crop",
            Stage::Rasterize => "rasterize",
            Stage::VectorConvert => "vector convert",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{stage} stage: program '{program}' not found")]
    NotFound { stage: Stage, program: String },

    #[error("{stage} stage: failed to start '{program}': {source}")]
    Spawn {
        stage: Stage,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{stage} stage failed ({}){}", exit_label(*exit_code), tail_suffix(stderr_tail))]
    Failed {
        stage: Stage,
        exit_code: Option<i32>,
        stderr_tail: String,
    },
}

impl ToolError {
    pub fn stage(&self) -> Stage {
        match self {
            ToolError::NotFound { stage, .. }
            | ToolError::Spawn { stage, .. }
            | ToolError::Failed { stage, .. } => *stage,
        }
    }
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn tail_suffix(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!(":\n{}", tail)
    }
}

/// Run `command` with `args` appended, inside `cwd`, blocking until it exits.
///
/// `command` is a program optionally followed by leading arguments separated by
/// whitespace, e.g. `magick convert`.
pub fn run_tool<S: AsRef<OsStr>>(
    stage: Stage,
    command: &str,
    args: &[S],
    cwd: &Path,
) -> Result<(), ToolError> {
    let mut words = command.split_whitespace();
    let program = words.next().ok_or_else(|| ToolError::NotFound {
        stage,
        program: command.to_string(),
    })?;
    let leading: Vec<&str> = words.collect();

    log::debug!(
        "{}: {} {}",
        stage,
        command.trim(),
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = Command::new(program)
        .args(&leading)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ToolError::NotFound {
                stage,
                program: program.to_string(),
            },
            _ => ToolError::Spawn {
                stage,
                program: program.to_string(),
                source,
            },
        })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr_tail = if stderr.trim().is_empty() {
        tail(&String::from_utf8_lossy(&output.stdout), TAIL_LINES)
    } else {
        tail(&stderr, TAIL_LINES)
    };

    Err(ToolError::Failed {
        stage,
        exit_code: output.status.code(),
        stderr_tail,
    })
}

/// Last `n` non-empty lines of `text`
pub fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        assert_eq!(tail("a\nb\n\nc\n", 2), "b\nc");
        assert_eq!(tail("a\n", 5), "a");
        assert_eq!(tail("", 5), "");
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(Stage::Typeset, "circuitikz-no-such-tool", &["x.tex"], dir.path())
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { stage: Stage::Typeset, .. }));
        assert!(err.to_string().contains("circuitikz-no-such-tool"));
    }

    #[test]
    fn test_empty_command() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(Stage::Crop, "  ", &["a.pdf"], dir.path()).unwrap_err();
        assert_eq!(err.stage(), Stage::Crop);
    }

    #[cfg(unix)]
    #[test]
    fn test_leading_arguments() {
        let dir = tempfile::tempdir().unwrap();
        run_tool(Stage::Rasterize, "sh -c", &["touch leading"], dir.path()).unwrap();
        assert!(dir.path().join("leading").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_success_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        run_tool(Stage::Crop, "sh", &["-c", "echo ok > marker"], dir.path()).unwrap();
        assert!(dir.path().join("marker").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_captures_exit_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            Stage::Rasterize,
            "sh",
            &["-c", "echo noise; echo 'convert: no images defined' >&2; exit 3"],
            dir.path(),
        )
        .unwrap_err();

        match err {
            ToolError::Failed { stage, exit_code, ref stderr_tail } => {
                assert_eq!(stage, Stage::Rasterize);
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr_tail, "convert: no images defined");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().starts_with("rasterize stage failed (exit code 3)"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_falls_back_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            Stage::Typeset,
            "sh",
            &["-c", "echo '! Undefined control sequence.'; exit 1"],
            dir.path(),
        )
        .unwrap_err();
        match err {
            ToolError::Failed { stderr_tail, .. } => {
                assert_eq!(stderr_tail, "! Undefined control sequence.")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
