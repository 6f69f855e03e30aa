//! stderr logging through `env_logger`.
//!
//! Level comes from the CLI verbosity, overridden by `CIRCUITIKZ_LOG`, which takes the
//! usual `env_logger` filter syntax (`debug`, `circuitikz=trace`, ...).

use log::{Level, LevelFilter};
use std::io::Write;

pub const LOG_ENV: &str = "CIRCUITIKZ_LOG";

/// Map `-v` counts onto a level filter; warnings are always shown
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn builder(verbose: u8) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for_verbosity(verbose))
        .parse_env(LOG_ENV)
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(buf, "Error: {}", record.args()),
            Level::Warn => writeln!(buf, "Warning: {}", record.args()),
            level => writeln!(buf, "[{}] {}", level, record.args()),
        });
    builder
}

/// Install the logger. Later calls are ignored.
pub fn init(verbose: u8) {
    let _ = builder(verbose).try_init();
}
