// Option-line parser: `key=value` tokens applied on top of RenderOptions

use super::lexer::{key_value, tokens};
use crate::{OutputFormat, RenderOptions};
use thiserror::Error;

/// Non-fatal problem found while reading an option line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionWarning {
    #[error("unrecognized option '{0}'")]
    UnrecognizedKey(String),
    #[error("ignoring malformed option '{0}' (expected key=value)")]
    MalformedToken(String),
    #[error("ignoring invalid value '{value}' for option '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },
}

/// Parse an option line starting from the default options.
/// Warnings are logged; the call never fails.
pub fn parse_options(line: &str) -> RenderOptions {
    parse_options_with_warnings(line).0
}

/// Same as [`parse_options`] but also hands the warnings back to the caller
pub fn parse_options_with_warnings(line: &str) -> (RenderOptions, Vec<OptionWarning>) {
    let mut options = RenderOptions::default();
    let warnings = apply_option_line(&mut options, line);
    (options, warnings)
}

/// Apply every token of `line` to `options`, in order. Later tokens win.
pub fn apply_option_line(options: &mut RenderOptions, line: &str) -> Vec<OptionWarning> {
    // `tokens` only fails on inputs it cannot make progress on; treat that as empty
    let toks = tokens(line).map(|(_, toks)| toks).unwrap_or_default();

    let mut warnings = Vec::new();
    for tok in toks {
        let result = match key_value(tok) {
            Ok((_, (key, value))) => apply_option(options, key, value),
            Err(_) => Err(OptionWarning::MalformedToken(tok.to_string())),
        };
        if let Err(warning) = result {
            log::warn!("{}", warning);
            warnings.push(warning);
        }
    }
    warnings
}

fn apply_option(
    options: &mut RenderOptions,
    key: &str,
    value: &str,
) -> Result<(), OptionWarning> {
    let invalid = |reason| OptionWarning::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    match key {
        "filename" => {
            check_base_name(value).map_err(invalid)?;
            options.output_base_name = value.to_string();
        }
        "dpi" => {
            let dpi = value.parse::<u32>().map_err(|_| invalid(DENSITY_REASON))?;
            check_density(dpi).map_err(invalid)?;
            options.raster_density = dpi;
        }
        "options" => options.circuitikz_package_options = value.to_string(),
        "format" => {
            options.output_format =
                OutputFormat::from_name(value).ok_or_else(|| invalid("expected png or svg"))?;
        }
        _ => return Err(OptionWarning::UnrecognizedKey(key.to_string())),
    }
    Ok(())
}

const DENSITY_REASON: &str = "expected a positive integer";

/// The base name must stay a plain file name inside the working directory, and must not
/// look like a command-line flag to the tools.
fn check_base_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        Err("file name is empty")
    } else if name.contains(&['/', '\\'][..]) {
        Err("file name must not contain a path separator")
    } else if name.starts_with('-') {
        Err("file name must not start with '-'")
    } else {
        Ok(())
    }
}

fn check_density(dpi: u32) -> Result<(), &'static str> {
    if dpi == 0 {
        Err(DENSITY_REASON)
    } else {
        Ok(())
    }
}

impl RenderOptions {
    /// Check options that did not come through an option line (config files, direct
    /// construction) against the same rules the parser applies.
    pub fn validate(&self) -> Result<(), OptionWarning> {
        check_base_name(&self.output_base_name).map_err(|reason| OptionWarning::InvalidValue {
            key: "filename".to_string(),
            value: self.output_base_name.clone(),
            reason,
        })?;
        check_density(self.raster_density).map_err(|reason| OptionWarning::InvalidValue {
            key: "dpi".to_string(),
            value: self.raster_density.to_string(),
            reason,
        })
    }
}
