// Option-line and cell parser

pub mod cell;
pub mod lexer;
pub mod options;

// Public API re-exports
pub use cell::split_cell;
pub use options::{parse_options, parse_options_with_warnings, OptionWarning};
