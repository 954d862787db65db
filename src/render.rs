//! Rendering: walks a directive sequence with resolved argument values and
//! writes the formatted output through a sink.
//!
//! Width, precision and sign handling follow POSIX printf rules, with the
//! deviations the directive grammar fixes: no `#` alternate forms, 3-digit
//! exponents for `%e`/`%E`, and `%g`/`%G` choosing whichever candidate form
//! is shorter (fixed form winning ties).
//!
//! Rendering never fails on the values themselves: NaN and infinities render
//! in their canonical textual form. The only render-time failure is a sink
//! write error, which aborts the walk.

use std::fmt;

use rust_decimal::Decimal;

use crate::args::FormatArg;
use crate::derive::ArgType;
use crate::directive::{Conversion, Directive, FormatFlags, Placeholder, Precision, Width};
use crate::error::FormatError;
use crate::sink::Sink;

// ---------------------------------------------------------------------------
// Runtime walk
// ---------------------------------------------------------------------------

/// Render `directives` with `args` into `sink`.
///
/// Arguments are consumed in strict left-to-right order, matching the
/// derived type chain; `*` widths and precisions consume their integer
/// argument immediately before the value they modify.
pub fn render(
    directives: &[Directive],
    args: &[FormatArg<'_>],
    sink: &mut dyn Sink,
) -> Result<(), FormatError> {
    let mut cursor = ArgCursor { args, index: 0 };

    for directive in directives {
        match directive {
            Directive::Literal(text) => sink.write_str(text)?,
            Directive::Placeholder(ph) => {
                let mut ph = *ph;
                if ph.width == Width::FromArg {
                    ph.set_dynamic_width(cursor.next_int()?);
                }
                if ph.precision == Precision::FromArg {
                    ph.set_dynamic_precision(cursor.next_int()?);
                }
                render_placeholder(&ph, &mut cursor, sink)?;
            }
        }
    }

    if cursor.index != args.len() {
        return Err(FormatError::ArgumentCountMismatch {
            expected: cursor.index,
            found: args.len(),
        });
    }
    Ok(())
}

fn render_placeholder(
    ph: &Placeholder,
    cursor: &mut ArgCursor<'_, '_>,
    sink: &mut dyn Sink,
) -> Result<(), FormatError> {
    match ph.conversion {
        Conversion::Bool => fmt_bool(sink, ph, cursor.next_bool()?),
        Conversion::Str => fmt_str(sink, ph, cursor.next_str()?),
        Conversion::Char => fmt_char(sink, ph, cursor.next_char()?),
        Conversion::SignedDec => fmt_signed(sink, ph, cursor.next_int()?),
        Conversion::UnsignedDec | Conversion::HexLower | Conversion::HexUpper
        | Conversion::Octal => fmt_unsigned(sink, ph, cursor.next_uint()?),
        Conversion::FloatExp { .. }
        | Conversion::FloatFixed { .. }
        | Conversion::FloatGeneral { .. } => fmt_float(sink, ph, cursor.next_float()?),
        Conversion::Decimal => fmt_decimal(sink, ph, cursor.next_decimal()?),
        Conversion::Display => fmt_display(sink, ph, cursor.next_display()?),
        Conversion::Structural => fmt_structural(sink, ph, cursor.next_structural()?),
        Conversion::ContextWith => {
            let function = cursor.next_with()?;
            let operand = cursor.next_operand()?;
            function(sink, operand)
        }
        Conversion::ContextAction => {
            let function = cursor.next_action()?;
            function(sink)
        }
    }
}

/// Left-to-right argument consumption with per-slot type checking.
struct ArgCursor<'a, 'v> {
    args: &'a [FormatArg<'v>],
    index: usize,
}

impl<'a, 'v> ArgCursor<'a, 'v> {
    fn next(&mut self, expected: ArgType) -> Result<FormatArg<'v>, FormatError> {
        let Some(arg) = self.args.get(self.index).copied() else {
            return Err(FormatError::ArgumentCountMismatch {
                expected: self.index + 1,
                found: self.args.len(),
            });
        };
        if !expected.accepts(&arg) {
            return Err(FormatError::ArgumentTypeMismatch {
                index: self.index,
                expected: expected.name(),
                found: arg.kind(),
            });
        }
        self.index += 1;
        Ok(arg)
    }

    fn mismatch(&self, expected: ArgType, found: &FormatArg<'_>) -> FormatError {
        FormatError::ArgumentTypeMismatch {
            index: self.index.saturating_sub(1),
            expected: expected.name(),
            found: found.kind(),
        }
    }

    fn next_int(&mut self) -> Result<i64, FormatError> {
        match self.next(ArgType::Int)? {
            FormatArg::Signed(v) => Ok(v),
            FormatArg::Unsigned(v) => Ok(v as i64),
            other => Err(self.mismatch(ArgType::Int, &other)),
        }
    }

    fn next_uint(&mut self) -> Result<u64, FormatError> {
        match self.next(ArgType::Int)? {
            FormatArg::Signed(v) => Ok(v as u64),
            FormatArg::Unsigned(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Int, &other)),
        }
    }

    fn next_bool(&mut self) -> Result<bool, FormatError> {
        match self.next(ArgType::Bool)? {
            FormatArg::Bool(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Bool, &other)),
        }
    }

    fn next_str(&mut self) -> Result<&'v str, FormatError> {
        match self.next(ArgType::Str)? {
            FormatArg::Str(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Str, &other)),
        }
    }

    fn next_char(&mut self) -> Result<char, FormatError> {
        match self.next(ArgType::Char)? {
            FormatArg::Char(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Char, &other)),
        }
    }

    fn next_float(&mut self) -> Result<f64, FormatError> {
        match self.next(ArgType::Float)? {
            FormatArg::Float(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Float, &other)),
        }
    }

    fn next_decimal(&mut self) -> Result<Decimal, FormatError> {
        match self.next(ArgType::Decimal)? {
            FormatArg::Decimal(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Decimal, &other)),
        }
    }

    fn next_display(&mut self) -> Result<&'v dyn fmt::Display, FormatError> {
        match self.next(ArgType::Display)? {
            FormatArg::Display(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Display, &other)),
        }
    }

    fn next_structural(&mut self) -> Result<&'v dyn fmt::Debug, FormatError> {
        match self.next(ArgType::Structural)? {
            FormatArg::Structural(v) => Ok(v),
            other => Err(self.mismatch(ArgType::Structural, &other)),
        }
    }

    fn next_with(&mut self) -> Result<&'v crate::args::ContextFn<'v>, FormatError> {
        match self.next(ArgType::ContextFn)? {
            FormatArg::With(v) => Ok(v),
            other => Err(self.mismatch(ArgType::ContextFn, &other)),
        }
    }

    fn next_operand(&mut self) -> Result<&'v dyn std::any::Any, FormatError> {
        match self.next(ArgType::ContextOperand)? {
            FormatArg::Operand(v) => Ok(v),
            other => Err(self.mismatch(ArgType::ContextOperand, &other)),
        }
    }

    fn next_action(&mut self) -> Result<&'v crate::args::ActionFn<'v>, FormatError> {
        match self.next(ArgType::ActionFn)? {
            FormatArg::Action(v) => Ok(v),
            other => Err(self.mismatch(ArgType::ActionFn, &other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-conversion renderers (called directly by macro-generated code)
// ---------------------------------------------------------------------------

/// `%b`: `true` / `false`, string padding semantics.
pub fn fmt_bool(sink: &mut dyn Sink, ph: &Placeholder, value: bool) -> Result<(), FormatError> {
    emit_text(sink, ph, if value { "true" } else { "false" })
}

/// `%s`: unescaped string. Precision truncates; width pads with spaces.
pub fn fmt_str(sink: &mut dyn Sink, ph: &Placeholder, value: &str) -> Result<(), FormatError> {
    emit_text(sink, ph, value)
}

/// `%c`: a single character.
pub fn fmt_char(sink: &mut dyn Sink, ph: &Placeholder, value: char) -> Result<(), FormatError> {
    let mut buf = [0u8; 4];
    emit_text(sink, ph, value.encode_utf8(&mut buf))
}

/// `%d` / `%i`: signed decimal.
pub fn fmt_signed(sink: &mut dyn Sink, ph: &Placeholder, value: i64) -> Result<(), FormatError> {
    let digits = value.unsigned_abs().to_string();
    let body = int_body(digits, ph, value == 0);
    emit_numeric(sink, ph, sign_char(value < 0, &ph.flags), &body)
}

/// `%u` / `%x` / `%X` / `%o`: unsigned rendering in the conversion's base,
/// no prefix, no sign.
pub fn fmt_unsigned(sink: &mut dyn Sink, ph: &Placeholder, value: u64) -> Result<(), FormatError> {
    let digits = match ph.conversion {
        Conversion::HexLower => format!("{value:x}"),
        Conversion::HexUpper => format!("{value:X}"),
        Conversion::Octal => format!("{value:o}"),
        _ => value.to_string(),
    };
    let body = int_body(digits, ph, value == 0);
    emit_numeric(sink, ph, None, &body)
}

/// `%e`/`%E`, `%f`/`%F`, `%g`/`%G`. NaN and infinities render canonically.
pub fn fmt_float(sink: &mut dyn Sink, ph: &Placeholder, value: f64) -> Result<(), FormatError> {
    let upper = matches!(
        ph.conversion,
        Conversion::FloatExp { upper: true }
            | Conversion::FloatFixed { upper: true }
            | Conversion::FloatGeneral { upper: true }
    );

    if value.is_nan() {
        return emit_special(sink, ph, if upper { "NAN" } else { "nan" });
    }
    if value.is_infinite() {
        let text = match (upper, value > 0.0) {
            (true, true) => "INF",
            (true, false) => "-INF",
            (false, true) => "inf",
            (false, false) => "-inf",
        };
        return emit_special(sink, ph, text);
    }

    let negative = value.is_sign_negative();
    let abs = value.abs();
    let precision = precision_of(ph).unwrap_or(6);
    let body = match ph.conversion {
        Conversion::FloatExp { upper } => exp_body(abs, precision, upper),
        Conversion::FloatGeneral { upper } => general_body(abs, precision, upper),
        _ => fixed_body(abs, precision),
    };
    emit_numeric(sink, ph, sign_char(negative, &ph.flags), &body)
}

/// `%M`: arbitrary-precision decimal; precision is digits after the point.
pub fn fmt_decimal(sink: &mut dyn Sink, ph: &Placeholder, value: Decimal) -> Result<(), FormatError> {
    let negative = value.is_sign_negative();
    let abs = value.abs();
    let body = match precision_of(ph) {
        // Round first: Decimal's Display truncates excess fraction digits
        // rather than rounding them.
        Some(p) => format!("{:.p$}", abs.round_dp(p as u32)),
        None => abs.to_string(),
    };
    emit_numeric(sink, ph, sign_char(negative, &ph.flags), &body)
}

/// `%O`: the value's own textual conversion.
pub fn fmt_display(
    sink: &mut dyn Sink,
    ph: &Placeholder,
    value: &dyn fmt::Display,
) -> Result<(), FormatError> {
    emit_text(sink, ph, &value.to_string())
}

/// `%A`: structural, type-directed layout, independent of any custom
/// textual conversion the value may have.
pub fn fmt_structural(
    sink: &mut dyn Sink,
    ph: &Placeholder,
    value: &dyn fmt::Debug,
) -> Result<(), FormatError> {
    emit_text(sink, ph, &format!("{value:?}"))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn resolve_width(ph: &Placeholder) -> usize {
    match ph.width {
        Width::Fixed(w) => w,
        _ => 0,
    }
}

fn precision_of(ph: &Placeholder) -> Option<usize> {
    match ph.precision {
        Precision::Fixed(p) => Some(p),
        _ => None,
    }
}

fn sign_char(negative: bool, flags: &FormatFlags) -> Option<char> {
    if negative {
        Some('-')
    } else if flags.force_sign {
        Some('+')
    } else if flags.space_sign {
        Some(' ')
    } else {
        None
    }
}

fn pad(sink: &mut dyn Sink, fill: char, mut count: usize) -> Result<(), FormatError> {
    const SPACES: &str = "                                ";
    const ZEROS: &str = "00000000000000000000000000000000";
    let bank = if fill == '0' { ZEROS } else { SPACES };
    while count > 0 {
        let n = count.min(bank.len());
        sink.write_str(&bank[..n])?;
        count -= n;
    }
    Ok(())
}

/// Integer precision: minimum digit count, zero-extended. Value zero with
/// explicit precision zero emits no digits.
fn int_body(digits: String, ph: &Placeholder, is_zero: bool) -> String {
    match precision_of(ph) {
        Some(0) if is_zero => String::new(),
        Some(p) if p > digits.len() => {
            let mut body = "0".repeat(p - digits.len());
            body.push_str(&digits);
            body
        }
        _ => digits,
    }
}

/// Emit a numeric body with sign and width. Sign and zero padding precede
/// the digits; space padding surrounds the whole field.
fn emit_numeric(
    sink: &mut dyn Sink,
    ph: &Placeholder,
    sign: Option<char>,
    body: &str,
) -> Result<(), FormatError> {
    let width = resolve_width(ph);
    let content = usize::from(sign.is_some()) + body.len();
    let pad_total = width.saturating_sub(content);
    let flags = ph.flags;

    if !flags.left_justify && !flags.zero_pad {
        pad(sink, ' ', pad_total)?;
    }
    if let Some(c) = sign {
        sink.write_char(c)?;
    }
    if !flags.left_justify && flags.zero_pad {
        pad(sink, '0', pad_total)?;
    }
    sink.write_str(body)?;
    if flags.left_justify {
        pad(sink, ' ', pad_total)?;
    }
    Ok(())
}

/// Emit text with string semantics: precision truncates (by characters),
/// width pads with spaces regardless of the zero flag.
fn emit_text(sink: &mut dyn Sink, ph: &Placeholder, text: &str) -> Result<(), FormatError> {
    let text = match precision_of(ph) {
        Some(p) => match text.char_indices().nth(p) {
            Some((end, _)) => &text[..end],
            None => text,
        },
        None => text,
    };
    let width = resolve_width(ph);
    let pad_total = width.saturating_sub(text.chars().count());

    if !ph.flags.left_justify {
        pad(sink, ' ', pad_total)?;
    }
    sink.write_str(text)?;
    if ph.flags.left_justify {
        pad(sink, ' ', pad_total)?;
    }
    Ok(())
}

/// NaN/infinity: width applies with space padding; precision and the zero
/// flag do not.
fn emit_special(sink: &mut dyn Sink, ph: &Placeholder, text: &str) -> Result<(), FormatError> {
    let width = resolve_width(ph);
    let pad_total = width.saturating_sub(text.len());
    if !ph.flags.left_justify {
        pad(sink, ' ', pad_total)?;
    }
    sink.write_str(text)?;
    if ph.flags.left_justify {
        pad(sink, ' ', pad_total)?;
    }
    Ok(())
}

/// `%f` body: fixed-point with the given fraction digit count.
fn fixed_body(abs: f64, precision: usize) -> String {
    format!("{abs:.precision$}")
}

/// `%e` body: one digit before the point, 3-digit exponent with explicit
/// sign.
fn exp_body(abs: f64, precision: usize, upper: bool) -> String {
    let e = if upper { 'E' } else { 'e' };
    if abs == 0.0 {
        return if precision == 0 {
            format!("0{e}+000")
        } else {
            format!("{:.precision$}{e}+000", 0.0)
        };
    }
    let mut exp = abs.log10().floor() as i32;
    let mut mantissa = abs / 10f64.powi(exp);
    // Rounding at the target precision can carry the mantissa to 10.x;
    // renormalize so exactly one digit precedes the point.
    if format!("{mantissa:.precision$}").starts_with("10") {
        exp += 1;
        mantissa = abs / 10f64.powi(exp);
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa:.precision$}{e}{sign}{:03}", exp.unsigned_abs())
}

/// `%g` body: precision counts significant digits (zero means one). Both
/// candidate forms are produced with trailing zeros stripped; the shorter
/// one is emitted and the fixed form wins ties.
fn general_body(abs: f64, precision: usize, upper: bool) -> String {
    let p = precision.max(1);
    if abs == 0.0 {
        return "0".to_string();
    }

    let exp10 = abs.log10().floor() as i32;
    let frac = p as i32 - 1 - exp10;
    let mut fixed = if frac >= 0 {
        format!("{abs:.0$}", frac as usize)
    } else {
        // Integer part longer than the significant-digit budget: round the
        // excess digits away before comparing candidate lengths.
        let scale = 10f64.powi(-frac);
        format!("{:.0}", (abs / scale).round() * scale)
    };
    strip_trailing_zeros(&mut fixed);

    let mut exp_form = exp_body(abs, p - 1, upper);
    if let Some(e_pos) = exp_form.bytes().position(|b| b == b'e' || b == b'E') {
        let mut mantissa = exp_form[..e_pos].to_string();
        strip_trailing_zeros(&mut mantissa);
        let exponent = &exp_form[e_pos..];
        exp_form = format!("{mantissa}{exponent}");
    }

    if fixed.len() <= exp_form.len() {
        fixed
    } else {
        exp_form
    }
}

/// Remove trailing zeros after the decimal point, and the point itself if
/// nothing remains behind it.
fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    fn ph(conversion: Conversion) -> Placeholder {
        Placeholder {
            flags: FormatFlags::default(),
            width: Width::None,
            precision: Precision::None,
            conversion,
        }
    }

    fn run(f: impl FnOnce(&mut dyn Sink) -> Result<(), FormatError>) -> String {
        let mut sink = StringSink::new();
        f(&mut sink).unwrap();
        sink.into_string()
    }

    #[test]
    fn signed_basic_and_negative() {
        let spec = ph(Conversion::SignedDec);
        assert_eq!(run(|s| fmt_signed(s, &spec, 42)), "42");
        assert_eq!(run(|s| fmt_signed(s, &spec, -123)), "-123");
        assert_eq!(
            run(|s| fmt_signed(s, &spec, i64::MIN)),
            "-9223372036854775808"
        );
    }

    #[test]
    fn signed_width_padding_variants() {
        let mut spec = ph(Conversion::SignedDec);
        spec.width = Width::Fixed(6);
        assert_eq!(run(|s| fmt_signed(s, &spec, 42)), "    42");

        spec.flags.zero_pad = true;
        assert_eq!(run(|s| fmt_signed(s, &spec, 42)), "000042");

        spec.flags.zero_pad = false;
        spec.flags.left_justify = true;
        assert_eq!(run(|s| fmt_signed(s, &spec, 42)), "42    ");
    }

    #[test]
    fn zero_pad_keeps_sign_first() {
        let mut spec = ph(Conversion::SignedDec);
        spec.width = Width::Fixed(8);
        spec.flags.zero_pad = true;
        assert_eq!(run(|s| fmt_signed(s, &spec, -42)), "-0000042");
    }

    #[test]
    fn sign_flags() {
        let mut spec = ph(Conversion::SignedDec);
        spec.flags.force_sign = true;
        assert_eq!(run(|s| fmt_signed(s, &spec, 5)), "+5");

        let mut spec = ph(Conversion::SignedDec);
        spec.flags.space_sign = true;
        assert_eq!(run(|s| fmt_signed(s, &spec, 5)), " 5");
    }

    #[test]
    fn hex_and_octal() {
        assert_eq!(run(|s| fmt_unsigned(s, &ph(Conversion::HexLower), 255)), "ff");
        assert_eq!(run(|s| fmt_unsigned(s, &ph(Conversion::HexUpper), 255)), "FF");
        assert_eq!(run(|s| fmt_unsigned(s, &ph(Conversion::Octal), 8)), "10");
        assert_eq!(run(|s| fmt_unsigned(s, &ph(Conversion::UnsignedDec), 7)), "7");
    }

    #[test]
    fn integer_precision_is_minimum_digits() {
        let mut spec = ph(Conversion::SignedDec);
        spec.precision = Precision::Fixed(5);
        assert_eq!(run(|s| fmt_signed(s, &spec, 42)), "00042");

        spec.precision = Precision::Fixed(0);
        assert_eq!(run(|s| fmt_signed(s, &spec, 0)), "");
    }

    #[test]
    fn string_precision_truncates() {
        let mut spec = ph(Conversion::Str);
        assert_eq!(run(|s| fmt_str(s, &spec, "abc")), "abc");

        spec.precision = Precision::Fixed(3);
        assert_eq!(run(|s| fmt_str(s, &spec, "hello")), "hel");

        spec.precision = Precision::None;
        spec.width = Width::Fixed(5);
        spec.flags.left_justify = true;
        assert_eq!(run(|s| fmt_str(s, &spec, "ab")), "ab   ");
    }

    #[test]
    fn bool_and_char() {
        assert_eq!(run(|s| fmt_bool(s, &ph(Conversion::Bool), true)), "true");
        assert_eq!(run(|s| fmt_bool(s, &ph(Conversion::Bool), false)), "false");

        let mut spec = ph(Conversion::Char);
        spec.width = Width::Fixed(3);
        assert_eq!(run(|s| fmt_char(s, &spec, 'A')), "  A");
    }

    #[test]
    fn float_fixed_defaults_to_six_digits() {
        let spec = ph(Conversion::FloatFixed { upper: false });
        assert_eq!(run(|s| fmt_float(s, &spec, 1.5)), "1.500000");

        let mut spec = spec;
        spec.precision = Precision::Fixed(2);
        spec.width = Width::Fixed(6);
        assert_eq!(run(|s| fmt_float(s, &spec, 3.14159)), "  3.14");
    }

    #[test]
    fn float_exp_has_three_digit_exponent() {
        let mut spec = ph(Conversion::FloatExp { upper: false });
        spec.precision = Precision::Fixed(2);
        assert_eq!(run(|s| fmt_float(s, &spec, 150.0)), "1.50e+002");
        assert_eq!(run(|s| fmt_float(s, &spec, 0.015)), "1.50e-002");
        assert_eq!(run(|s| fmt_float(s, &spec, 0.0)), "0.00e+000");
    }

    #[test]
    fn float_exp_renormalizes_rounding_carry() {
        let mut spec = ph(Conversion::FloatExp { upper: false });
        spec.precision = Precision::Fixed(1);
        assert_eq!(run(|s| fmt_float(s, &spec, 9.99)), "1.0e+001");
    }

    #[test]
    fn float_exp_uppercase() {
        let mut spec = ph(Conversion::FloatExp { upper: true });
        spec.precision = Precision::Fixed(1);
        assert_eq!(run(|s| fmt_float(s, &spec, 150.0)), "1.5E+002");
    }

    #[test]
    fn float_general_prefers_fixed_on_tie() {
        let spec = ph(Conversion::FloatGeneral { upper: false });
        // "0.0001" and "1e-004" are equally long: fixed form wins.
        assert_eq!(run(|s| fmt_float(s, &spec, 0.0001)), "0.0001");
    }

    #[test]
    fn float_general_picks_shorter_form() {
        let spec = ph(Conversion::FloatGeneral { upper: false });
        assert_eq!(run(|s| fmt_float(s, &spec, 100.0)), "100");
        // "0.00001" (7 chars) loses to "1e-005" (6 chars).
        assert_eq!(run(|s| fmt_float(s, &spec, 0.00001)), "1e-005");
        assert_eq!(run(|s| fmt_float(s, &spec, 0.0)), "0");
    }

    #[test]
    fn float_general_rounds_long_integer_parts() {
        let mut spec = ph(Conversion::FloatGeneral { upper: false });
        // Seven integer digits against the default six significant digits:
        // the fixed candidate must round, not keep every digit.
        assert_eq!(run(|s| fmt_float(s, &spec, 1234567.0)), "1234570");

        spec.precision = Precision::Fixed(3);
        assert_eq!(run(|s| fmt_float(s, &spec, 1234567.0)), "1230000");
    }

    #[test]
    fn float_specials_render_canonically() {
        let lower = ph(Conversion::FloatFixed { upper: false });
        let upper = ph(Conversion::FloatGeneral { upper: true });
        assert_eq!(run(|s| fmt_float(s, &lower, f64::NAN)), "nan");
        assert_eq!(run(|s| fmt_float(s, &lower, f64::INFINITY)), "inf");
        assert_eq!(run(|s| fmt_float(s, &lower, f64::NEG_INFINITY)), "-inf");
        assert_eq!(run(|s| fmt_float(s, &upper, f64::NAN)), "NAN");
        assert_eq!(run(|s| fmt_float(s, &upper, f64::INFINITY)), "INF");
    }

    #[test]
    fn decimal_precision_and_sign() {
        use rust_decimal::Decimal;
        let mut spec = ph(Conversion::Decimal);
        let d = Decimal::new(12346, 2); // 123.46
        assert_eq!(run(|s| fmt_decimal(s, &spec, d)), "123.46");

        spec.precision = Precision::Fixed(1);
        assert_eq!(run(|s| fmt_decimal(s, &spec, d)), "123.5");

        spec.precision = Precision::None;
        spec.flags.force_sign = true;
        assert_eq!(run(|s| fmt_decimal(s, &spec, d)), "+123.46");
        assert_eq!(run(|s| fmt_decimal(s, &spec, -d)), "-123.46");
    }

    #[test]
    fn decimal_precision_rounds_rather_than_truncates() {
        use rust_decimal::Decimal;
        let mut spec = ph(Conversion::Decimal);
        spec.precision = Precision::Fixed(2);
        assert_eq!(run(|s| fmt_decimal(s, &spec, Decimal::new(999, 3))), "1.00");
        spec.precision = Precision::Fixed(1);
        assert_eq!(run(|s| fmt_decimal(s, &spec, Decimal::new(1994, 2))), "19.9");
    }

    #[test]
    fn display_and_structural_are_distinct_strategies() {
        struct Both;
        impl fmt::Display for Both {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("display form")
            }
        }
        impl fmt::Debug for Both {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("Both { .. }")
            }
        }

        let v = Both;
        assert_eq!(
            run(|s| fmt_display(s, &ph(Conversion::Display), &v)),
            "display form"
        );
        assert_eq!(
            run(|s| fmt_structural(s, &ph(Conversion::Structural), &v)),
            "Both { .. }"
        );
    }

    #[test]
    fn render_walk_consumes_left_to_right() {
        let directives = crate::format::parse_directives("%s=%d (%x)").unwrap();
        let out = run(|s| {
            render(
                &directives,
                &[
                    FormatArg::Str("answer"),
                    FormatArg::Signed(42),
                    FormatArg::Unsigned(255),
                ],
                s,
            )
        });
        assert_eq!(out, "answer=42 (ff)");
    }

    #[test]
    fn render_resolves_dynamic_width_before_value() {
        let directives = crate::format::parse_directives("%*d").unwrap();
        let out = run(|s| render(&directives, &[FormatArg::Signed(6), FormatArg::Signed(7)], s));
        assert_eq!(out, "     7");
    }

    #[test]
    fn render_negative_dynamic_width_left_justifies() {
        let directives = crate::format::parse_directives("%*d|").unwrap();
        let out = run(|s| render(&directives, &[FormatArg::Signed(-6), FormatArg::Signed(7)], s));
        assert_eq!(out, "7     |");
    }

    #[test]
    fn render_context_functions() {
        let directives = crate::format::parse_directives("<%a> <%t>").unwrap();
        let point = (3i32, 4i32);
        let with: &crate::args::ContextFn<'_> = &|sink, operand| {
            let (x, y) = operand
                .downcast_ref::<(i32, i32)>()
                .ok_or(FormatError::ArgumentTypeMismatch {
                    index: 1,
                    expected: "context operand",
                    found: "other",
                })?;
            sink.write_str(&format!("{x},{y}"))
        };
        let action: &crate::args::ActionFn<'_> = &|sink| sink.write_str("tick");
        let out = run(|s| {
            render(
                &directives,
                &[
                    FormatArg::With(with),
                    FormatArg::Operand(&point),
                    FormatArg::Action(action),
                ],
                s,
            )
        });
        assert_eq!(out, "<3,4> <tick>");
    }

    #[test]
    fn render_rejects_leftover_arguments() {
        let directives = crate::format::parse_directives("%d").unwrap();
        let mut sink = StringSink::new();
        let err = render(
            &directives,
            &[FormatArg::Signed(1), FormatArg::Signed(2)],
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, FormatError::ArgumentCountMismatch { .. }));
    }
}
