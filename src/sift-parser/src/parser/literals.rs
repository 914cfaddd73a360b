//! Lexical sub-parsers
//!
//! Small nom parsers that recognize the text of numbers and bare words, plus
//! the boundary scan that finds the end of a string literal.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize, verify},
    IResult, Parser,
};

/// Characters that may follow a literal without a separating space
pub(crate) fn is_delimiter(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, ')' | ']' | ',')
}

/// Recognize `-?\d+(\.\d+)?([eE][+-]?\d+)?`
pub(crate) fn number_text(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(char('-')),
        digit1,
        opt((char('.'), digit1)),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)
}

/// Recognize a bare word: a letter followed by letters, digits or `_`
pub(crate) fn word_text(input: &str) -> IResult<&str, &str> {
    verify(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        |word: &str| word.starts_with(|c: char| c.is_ascii_alphabetic()),
    )
    .parse(input)
}

/// Byte length of the string literal at the start of `input`, quotes included
///
/// `input` starts with the opening quote. The closing quote is the first `"`
/// followed by end of input or a delimiter; other quotes are content.
pub(crate) fn string_len(input: &str) -> Option<usize> {
    let body = input.strip_prefix('"')?;
    body.char_indices()
        .filter(|&(_, c)| c == '"')
        .map(|(i, _)| i + 1)
        .find(|&after| body[after..].chars().next().map_or(true, is_delimiter))
        .map(|after| after + 1)
}

/// Whether `content` survives quoting: no `"` inside it may be followed by a
/// delimiter, or [`string_len`] would end the literal there
pub(crate) fn fits_string_literal(content: &str) -> bool {
    !content
        .char_indices()
        .filter(|&(_, c)| c == '"')
        .any(|(i, _)| content[i + 1..].chars().next().is_some_and(is_delimiter))
}
