// Lexer primitives for the option line

use nom::{
    bytes::complete::{take_till1, take_while},
    character::complete::{char, multispace0, multispace1},
    combinator::rest,
    multi::separated_list0,
    sequence::{delimited, separated_pair},
    IResult,
};

/// A run of non-whitespace characters
pub fn token(input: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace)(input)
}

/// All whitespace-separated tokens of a line
pub fn tokens(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(multispace0, separated_list0(multispace1, token), multispace0)(input)
}

/// Split a token on its first `=`. The key must be non-empty; the value may be empty
/// and may itself contain `=`.
pub fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_till1(|c: char| c == '='), char('='), rest)(input)
}

/// Consume horizontal whitespace only (spaces and tabs)
pub fn blank(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ' ' || c == '\t')(input)
}
