// Cell-magic splitting: `%circuitikz key=value ...` followed by the diagram body

use super::lexer::blank;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{line_ending, not_line_ending},
    combinator::{opt, verify},
    sequence::preceded,
    IResult,
};

/// Parse the magic line, returning the option text after the marker
fn magic_line(input: &str) -> IResult<&str, &str> {
    let (input, _) = blank(input)?;
    let (input, options) = preceded(
        alt((tag("%%circuitikz"), tag("%circuitikz"))),
        // `%circuitikzfoo` is a LaTeX comment, not the marker
        verify(not_line_ending, |rest: &str| {
            rest.is_empty() || rest.starts_with(char::is_whitespace)
        }),
    )(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, options.trim()))
}

/// Split cell text into its option line (if the first line is the magic marker) and the
/// diagram source. Text without a marker is returned whole as the source.
pub fn split_cell(text: &str) -> (Option<&str>, &str) {
    match magic_line(text) {
        Ok((body, options)) => (Some(options), body),
        Err(_) => (None, text),
    }
}
