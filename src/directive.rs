//! Directive model for parsed format strings.
//!
//! A format string is parsed once into an ordered sequence of [`Directive`]
//! values. The sequence is immutable after parsing and drives both the type
//! deriver (compile-time use) and the renderer (run-time use).

/// Flags parsed from a `%`-directive.
///
/// The `#` (alternate form) flag is deliberately not representable: it is
/// rejected at parse time with [`FormatError::UnsupportedFlag`].
///
/// [`FormatError::UnsupportedFlag`]: crate::FormatError::UnsupportedFlag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    /// `0`: pad with zeros instead of spaces (numeric conversions).
    pub zero_pad: bool,
    /// `-`: left-justify within the field width.
    pub left_justify: bool,
    /// `+`: always emit a sign character for non-negative numbers.
    pub force_sign: bool,
    /// ` `: emit a space in place of a sign for non-negative numbers.
    /// `+` wins when both are present.
    pub space_sign: bool,
}

/// Minimum field width of a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Width {
    #[default]
    None,
    Fixed(usize),
    /// `*`: the width is consumed as an extra integer argument at render
    /// time, immediately before the value argument. A negative value implies
    /// left-justification at the absolute width.
    FromArg,
}

/// Precision of a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Precision {
    #[default]
    None,
    Fixed(usize),
    /// `.*`: consumed as an extra integer argument at render time.
    FromArg,
}

/// Conversion kind of a placeholder.
///
/// This is the closed set of conversion tags resolved at parse time; each
/// tag is bound to a rendering function in [`crate::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `%b`: bool as `true`/`false`.
    Bool,
    /// `%s`: string, unescaped.
    Str,
    /// `%c`: single character.
    Char,
    /// `%d` / `%i`: signed decimal integer.
    SignedDec,
    /// `%u`: unsigned decimal integer.
    UnsignedDec,
    /// `%x`: lowercase hex, unsigned, no prefix.
    HexLower,
    /// `%X`: uppercase hex, unsigned, no prefix.
    HexUpper,
    /// `%o`: octal, unsigned.
    Octal,
    /// `%e` / `%E`: exponent form, one digit before the point, 3-digit
    /// exponent with explicit sign.
    FloatExp { upper: bool },
    /// `%f` / `%F`: fixed form. Case only affects `nan`/`inf` spelling.
    FloatFixed { upper: bool },
    /// `%g` / `%G`: shorter of fixed and exponent form; fixed wins ties.
    FloatGeneral { upper: bool },
    /// `%M`: arbitrary-precision decimal ([`rust_decimal::Decimal`]).
    Decimal,
    /// `%O`: generic value via its own textual conversion (`fmt::Display`).
    Display,
    /// `%A`: generic value via structural, type-directed layout
    /// (`fmt::Debug`). Distinct strategy from `%O`; never conflated.
    Structural,
    /// `%a`: custom context function taking the sink and one operand.
    /// Consumes two arguments: the function, then the operand.
    ContextWith,
    /// `%t`: custom context function taking only the sink.
    ContextAction,
}

impl Conversion {
    /// Map a conversion character to its tag. `None` for unknown characters.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'b' => Self::Bool,
            's' => Self::Str,
            'c' => Self::Char,
            'd' | 'i' => Self::SignedDec,
            'u' => Self::UnsignedDec,
            'x' => Self::HexLower,
            'X' => Self::HexUpper,
            'o' => Self::Octal,
            'e' => Self::FloatExp { upper: false },
            'E' => Self::FloatExp { upper: true },
            'f' => Self::FloatFixed { upper: false },
            'F' => Self::FloatFixed { upper: true },
            'g' => Self::FloatGeneral { upper: false },
            'G' => Self::FloatGeneral { upper: true },
            'M' => Self::Decimal,
            'O' => Self::Display,
            'A' => Self::Structural,
            'a' => Self::ContextWith,
            't' => Self::ContextAction,
            _ => return None,
        })
    }
}

/// A placeholder directive: `%[flags][width][.precision]<conversion>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub conversion: Conversion,
}

impl Placeholder {
    /// Resolve a `*` width from a consumed integer argument.
    ///
    /// A negative width means left-justification at the absolute width,
    /// which also cancels zero padding.
    pub fn set_dynamic_width(&mut self, width: i64) {
        if width < 0 {
            self.flags.left_justify = true;
            self.flags.zero_pad = false;
        }
        self.width = Width::Fixed(width.unsigned_abs() as usize);
    }

    /// Resolve a `.*` precision from a consumed integer argument.
    /// A negative precision is treated as absent.
    pub fn set_dynamic_precision(&mut self, precision: i64) {
        self.precision = if precision < 0 {
            Precision::None
        } else {
            Precision::Fixed(precision as usize)
        };
    }
}

/// One parsed unit of a format string.
///
/// Uses `Box<str>` for literal text: the segment is immutable after parsing,
/// so the capacity field of a `String` would be dead weight.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Literal text emitted verbatim. `%%` parses to `Literal("%")`.
    Literal(Box<str>),
    /// A conversion consuming one or more arguments.
    Placeholder(Placeholder),
}
