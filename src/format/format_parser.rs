//! nom grammar for `%[flags][width][.precision]<conversion>` directives.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{char, digit1},
    combinator::{map, map_res, success, value},
    error::{ErrorKind, FromExternalError, ParseError},
    multi::many0,
    sequence::preceded,
};

use crate::directive::{Conversion, Directive, FormatFlags, Placeholder, Precision, Width};

/// Parse error carrying the remaining input so the caller can recover the
/// byte offset of the failure.
#[derive(Debug)]
pub(super) struct DirectiveError<'a> {
    pub(super) input: &'a str,
    pub(super) kind: DirectiveErrorKind,
}

#[derive(Debug)]
pub(super) enum DirectiveErrorKind {
    /// Generic combinator failure; reported as an invalid directive.
    Nom(ErrorKind),
    /// The `#` flag, rejected by contract.
    UnsupportedFlag(char),
    /// Unknown conversion character or truncated directive.
    InvalidDirective,
}

impl<'a> ParseError<&'a str> for DirectiveError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: DirectiveErrorKind::Nom(kind),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> FromExternalError<&'a str, std::num::ParseIntError> for DirectiveError<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: std::num::ParseIntError) -> Self {
        Self {
            input,
            kind: DirectiveErrorKind::Nom(kind),
        }
    }
}

type PResult<'a, T> = IResult<&'a str, T, DirectiveError<'a>>;

/// Tokenize a whole format string into directives.
pub(super) fn directives(input: &str) -> PResult<'_, Vec<Directive>> {
    many0(directive).parse(input)
}

fn directive(input: &str) -> PResult<'_, Directive> {
    alt((percent_escape, placeholder, literal_text)).parse(input)
}

fn literal_text(input: &str) -> PResult<'_, Directive> {
    map(take_till1(|c| c == '%'), |text: &str| {
        Directive::Literal(text.into())
    })
    .parse(input)
}

fn percent_escape(input: &str) -> PResult<'_, Directive> {
    value(Directive::Literal("%".into()), tag("%%")).parse(input)
}

fn placeholder(input: &str) -> PResult<'_, Directive> {
    let (rest, _) = char('%').parse(input)?;
    let (rest, flags) = flags(rest)?;
    let (rest, width) = width(rest)?;
    let (rest, precision) = precision(rest)?;
    let (rest, conversion) = conversion(rest)?;
    Ok((
        rest,
        Directive::Placeholder(Placeholder {
            flags,
            width,
            precision,
            conversion,
        }),
    ))
}

/// Scan the flag run. `#` anywhere in it is a hard failure.
fn flags(input: &str) -> PResult<'_, FormatFlags> {
    let mut flags = FormatFlags::default();
    let mut rest = input;
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('0') => flags.zero_pad = true,
            Some('-') => flags.left_justify = true,
            Some('+') => flags.force_sign = true,
            Some(' ') => flags.space_sign = true,
            Some('#') => {
                return Err(nom::Err::Failure(DirectiveError {
                    input: rest,
                    kind: DirectiveErrorKind::UnsupportedFlag('#'),
                }));
            }
            _ => break,
        }
        rest = chars.as_str();
    }
    // '+' wins over ' '; '-' cancels '0'.
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }
    Ok((rest, flags))
}

fn width(input: &str) -> PResult<'_, Width> {
    alt((
        value(Width::FromArg, char('*')),
        map(map_res(digit1, str::parse::<usize>), Width::Fixed),
        success(Width::None),
    ))
    .parse(input)
}

fn precision(input: &str) -> PResult<'_, Precision> {
    alt((
        preceded(
            char('.'),
            alt((
                value(Precision::FromArg, char('*')),
                map(map_res(digit1, str::parse::<usize>), Precision::Fixed),
                // A bare '.' means precision zero, as in C.
                success(Precision::Fixed(0)),
            )),
        ),
        success(Precision::None),
    ))
    .parse(input)
}

fn conversion(input: &str) -> PResult<'_, Conversion> {
    let mut chars = input.chars();
    match chars.next() {
        // '#' after width/precision is still the rejected flag, not an
        // unknown conversion.
        Some('#') => Err(nom::Err::Failure(DirectiveError {
            input,
            kind: DirectiveErrorKind::UnsupportedFlag('#'),
        })),
        Some(c) => match Conversion::from_char(c) {
            Some(conversion) => Ok((chars.as_str(), conversion)),
            None => Err(nom::Err::Failure(DirectiveError {
                input,
                kind: DirectiveErrorKind::InvalidDirective,
            })),
        },
        None => Err(nom::Err::Failure(DirectiveError {
            input,
            kind: DirectiveErrorKind::InvalidDirective,
        })),
    }
}
