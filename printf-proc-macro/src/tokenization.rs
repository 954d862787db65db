//! Format string tokenization for compile-time code generation.
//!
//! Scans a format string literal into literal-text runs and placeholder
//! specs, enforcing the directive grammar and the compile-time security
//! limits. All diagnostics are [`syn::Error`]s spanned to the format
//! string literal.

use std::iter::Peekable;
use std::str::CharIndices;

use syn::LitStr;

use crate::constants::{
    MAX_FORMAT_STRING_LEN, MAX_TOKENS, TEXT_SEGMENT_CAPACITY, TOKENS_INITIAL_CAPACITY,
};
use crate::types::{FormatToken, PlaceholderSpec, SpecNumber};

/// Conversion characters the directive grammar accepts.
pub const CONVERSION_CHARS: &str = "bscdiuxXoeEfFgGMOAat";

/// Tokenize a format string into text runs and placeholders.
///
/// `%%` collapses into the surrounding text run. Directive errors report the
/// byte offset of the offending character within the literal.
pub fn tokenize_format_string(
    format_str: &str,
    format_lit: &LitStr,
) -> Result<Vec<FormatToken>, syn::Error> {
    if format_str.len() > MAX_FORMAT_STRING_LEN {
        return Err(syn::Error::new(
            format_lit.span(),
            format!(
                "format string too long: {} bytes exceeds maximum of {MAX_FORMAT_STRING_LEN}",
                format_str.len()
            ),
        ));
    }

    let mut tokens: Vec<FormatToken> = Vec::with_capacity(TOKENS_INITIAL_CAPACITY);
    let mut current_text = String::with_capacity(TEXT_SEGMENT_CAPACITY);
    let mut chars = format_str.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if ch != '%' {
            current_text.push(ch);
            continue;
        }
        if matches!(chars.peek(), Some((_, '%'))) {
            chars.next();
            current_text.push('%');
            continue;
        }
        if !current_text.is_empty() {
            push_token(
                &mut tokens,
                FormatToken::Text(std::mem::take(&mut current_text).into()),
                format_lit,
            )?;
        }
        let spec = scan_placeholder(&mut chars, offset, format_lit)?;
        push_token(&mut tokens, FormatToken::Placeholder(spec), format_lit)?;
    }

    if !current_text.is_empty() {
        push_token(
            &mut tokens,
            FormatToken::Text(current_text.into()),
            format_lit,
        )?;
    }

    Ok(tokens)
}

fn push_token(
    tokens: &mut Vec<FormatToken>,
    token: FormatToken,
    format_lit: &LitStr,
) -> Result<(), syn::Error> {
    if tokens.len() >= MAX_TOKENS {
        return Err(syn::Error::new(
            format_lit.span(),
            format!("format string too complex: exceeds maximum of {MAX_TOKENS} tokens"),
        ));
    }
    tokens.push(token);
    Ok(())
}

/// Scan one placeholder body, positioned just past the introducing `%`.
fn scan_placeholder(
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
    format_lit: &LitStr,
) -> Result<PlaceholderSpec, syn::Error> {
    let mut spec = PlaceholderSpec {
        zero_pad: false,
        left_justify: false,
        force_sign: false,
        space_sign: false,
        width: SpecNumber::None,
        precision: SpecNumber::None,
        conversion: '\0',
        offset: start,
    };

    loop {
        match chars.peek() {
            Some((_, '0')) => spec.zero_pad = true,
            Some((_, '-')) => spec.left_justify = true,
            Some((_, '+')) => spec.force_sign = true,
            Some((_, ' ')) => spec.space_sign = true,
            Some(&(pos, '#')) => {
                return Err(syn::Error::new(
                    format_lit.span(),
                    format!("unsupported flag '#' at byte {pos}: alternate form is not provided"),
                ));
            }
            _ => break,
        }
        chars.next();
    }
    // Flag precedence: '+' dominates ' ', '-' cancels '0'.
    if spec.force_sign {
        spec.space_sign = false;
    }
    if spec.left_justify {
        spec.zero_pad = false;
    }

    spec.width = scan_number(chars, format_lit)?;
    if matches!(chars.peek(), Some((_, '.'))) {
        chars.next();
        spec.precision = match scan_number(chars, format_lit)? {
            // A bare '.' means precision zero.
            SpecNumber::None => SpecNumber::Fixed(0),
            parsed => parsed,
        };
    }

    match chars.next() {
        Some((_, c)) if CONVERSION_CHARS.contains(c) => spec.conversion = c,
        Some((pos, '#')) => {
            return Err(syn::Error::new(
                format_lit.span(),
                format!("unsupported flag '#' at byte {pos}: flags must precede width"),
            ));
        }
        Some((pos, c)) => {
            return Err(syn::Error::new(
                format_lit.span(),
                format!("invalid directive at byte {pos}: unknown conversion '{c}'"),
            ));
        }
        None => {
            return Err(syn::Error::new(
                format_lit.span(),
                format!("invalid directive at byte {start}: format string ends mid-directive"),
            ));
        }
    }

    Ok(spec)
}

fn scan_number(
    chars: &mut Peekable<CharIndices<'_>>,
    format_lit: &LitStr,
) -> Result<SpecNumber, syn::Error> {
    if matches!(chars.peek(), Some((_, '*'))) {
        chars.next();
        return Ok(SpecNumber::FromArg);
    }
    let mut value: usize = 0;
    let mut seen = false;
    while let Some(&(pos, c)) = chars.peek() {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        seen = true;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit as usize))
            .ok_or_else(|| {
                syn::Error::new(
                    format_lit.span(),
                    format!("invalid directive at byte {pos}: width/precision overflows"),
                )
            })?;
        chars.next();
    }
    Ok(if seen {
        SpecNumber::Fixed(value)
    } else {
        SpecNumber::None
    })
}

#[cfg(test)]
mod tests {
    use proc_macro2::Span;

    use super::*;

    fn tokenize(fmt: &str) -> Result<Vec<FormatToken>, syn::Error> {
        let lit = LitStr::new(fmt, Span::call_site());
        tokenize_format_string(fmt, &lit)
    }

    #[test]
    fn plain_text_is_one_token() {
        let tokens = tokenize("hello world").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], FormatToken::Text(t) if &**t == "hello world"));
    }

    #[test]
    fn percent_escape_joins_surrounding_text() {
        let tokens = tokenize("100%% done").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], FormatToken::Text(t) if &**t == "100% done"));
    }

    #[test]
    fn full_placeholder_is_scanned() {
        let tokens = tokenize("%+08.3f").unwrap();
        let [FormatToken::Placeholder(spec)] = tokens.as_slice() else {
            panic!("expected one placeholder, got {tokens:?}");
        };
        assert!(spec.zero_pad && spec.force_sign);
        assert!(!spec.left_justify && !spec.space_sign);
        assert_eq!(spec.width, SpecNumber::Fixed(8));
        assert_eq!(spec.precision, SpecNumber::Fixed(3));
        assert_eq!(spec.conversion, 'f');
        assert_eq!(spec.offset, 0);
    }

    #[test]
    fn plus_flag_dominates_space_and_minus_cancels_zero() {
        let tokens = tokenize("% +d %-0d").unwrap();
        let specs: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t {
                FormatToken::Placeholder(spec) => Some(spec),
                FormatToken::Text(_) => None,
            })
            .collect();
        assert!(specs[0].force_sign && !specs[0].space_sign);
        assert!(specs[1].left_justify && !specs[1].zero_pad);
    }

    #[test]
    fn star_width_and_precision_come_from_args() {
        let tokens = tokenize("%*.*s").unwrap();
        let [FormatToken::Placeholder(spec)] = tokens.as_slice() else {
            panic!("expected one placeholder");
        };
        assert_eq!(spec.width, SpecNumber::FromArg);
        assert_eq!(spec.precision, SpecNumber::FromArg);
    }

    #[test]
    fn bare_dot_means_precision_zero() {
        let tokens = tokenize("%.f").unwrap();
        let [FormatToken::Placeholder(spec)] = tokens.as_slice() else {
            panic!("expected one placeholder");
        };
        assert_eq!(spec.precision, SpecNumber::Fixed(0));
    }

    #[test]
    fn hash_flag_is_rejected() {
        let err = tokenize("%#x").unwrap_err();
        assert!(err.to_string().contains("unsupported flag '#'"));
    }

    #[test]
    fn unknown_conversion_is_rejected_with_offset() {
        let err = tokenize("ab %q").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("byte 4") && message.contains('q'), "{message}");
    }

    #[test]
    fn trailing_percent_is_rejected() {
        let err = tokenize("broken %").unwrap_err();
        assert!(err.to_string().contains("ends mid-directive"));
    }

    #[test]
    fn overlong_format_string_is_rejected() {
        let big = "x".repeat(MAX_FORMAT_STRING_LEN + 1);
        let err = tokenize(&big).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn too_many_tokens_is_rejected() {
        let fmt = "%d ".repeat(MAX_TOKENS);
        let err = tokenize(&fmt).unwrap_err();
        assert!(err.to_string().contains("too complex"));
    }
}
