//! Runtime argument values and the widening traits used by the macros.

use std::any::Any;
use std::fmt;

use rust_decimal::Decimal;

use crate::error::FormatError;
use crate::sink::Sink;

/// Custom rendering function for `%a`: receives the sink and the operand.
///
/// The operand travels as `&dyn Any` on the runtime path; the function
/// downcasts it to the concrete type it was registered with. The macro path
/// calls the user function directly with a typed reference instead.
pub type ContextFn<'a> = dyn Fn(&mut dyn Sink, &dyn Any) -> Result<(), FormatError> + 'a;

/// Custom rendering function for `%t`: receives only the sink.
pub type ActionFn<'a> = dyn Fn(&mut dyn Sink) -> Result<(), FormatError> + 'a;

/// A value supplied to the runtime variadic render path.
///
/// Integer conversions accept both `Signed` and `Unsigned`: the conversion
/// alone does not fix the bit width or signedness of the argument, only its
/// rendering. `%u`/`%x`/`%X`/`%o` reinterpret a `Signed` value as unsigned,
/// as C does.
#[derive(Clone, Copy)]
pub enum FormatArg<'a> {
    Bool(bool),
    Str(&'a str),
    Char(char),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Decimal(Decimal),
    /// Operand for `%O`: rendered through its own `Display` impl.
    Display(&'a dyn fmt::Display),
    /// Operand for `%A`: rendered through its structural `Debug` layout.
    Structural(&'a dyn fmt::Debug),
    /// Function slot of `%a`.
    With(&'a ContextFn<'a>),
    /// Operand slot of `%a`, consumed immediately after `With`.
    Operand(&'a dyn Any),
    /// Function slot of `%t`.
    Action(&'a ActionFn<'a>),
}

impl FormatArg<'_> {
    /// Human-readable category name, used in mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::Char(_) => "char",
            Self::Signed(_) | Self::Unsigned(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Display(_) => "display value",
            Self::Structural(_) => "structural value",
            Self::With(_) => "context function",
            Self::Operand(_) => "context operand",
            Self::Action(_) => "context action",
        }
    }
}

impl fmt::Debug for FormatArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Str(v) => write!(f, "Str({v:?})"),
            Self::Char(v) => write!(f, "Char({v:?})"),
            Self::Signed(v) => write!(f, "Signed({v})"),
            Self::Unsigned(v) => write!(f, "Unsigned({v})"),
            Self::Float(v) => write!(f, "Float({v})"),
            Self::Decimal(v) => write!(f, "Decimal({v})"),
            Self::Display(_) => f.write_str("Display(..)"),
            Self::Structural(_) => f.write_str("Structural(..)"),
            Self::With(_) => f.write_str("With(..)"),
            Self::Operand(_) => f.write_str("Operand(..)"),
            Self::Action(_) => f.write_str("Action(..)"),
        }
    }
}

/// Widening for the "basic integer" category accepted by
/// `%d`/`%i`/`%u`/`%x`/`%X`/`%o` and by `*` width/precision slots.
///
/// The macro layer relies on this trait for its compile-time checking: only
/// integer types implement it, and the concrete width is resolved at the
/// call site rather than by the conversion.
pub trait FormatInt: Copy {
    fn widen_signed(self) -> i64;
    fn widen_unsigned(self) -> u64;
}

macro_rules! impl_format_int {
    ($($ty:ty),*) => {
        $(impl FormatInt for $ty {
            fn widen_signed(self) -> i64 {
                self as i64
            }
            fn widen_unsigned(self) -> u64 {
                self as u64
            }
        })*
    };
}

impl_format_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Widening for float conversions.
pub trait FormatFloat: Copy {
    fn widen(self) -> f64;
}

impl FormatFloat for f32 {
    fn widen(self) -> f64 {
        self as f64
    }
}

impl FormatFloat for f64 {
    fn widen(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_covers_native_sizes() {
        assert_eq!(42u8.widen_signed(), 42);
        assert_eq!((-1i32).widen_unsigned(), u64::MAX);
        assert_eq!(7usize.widen_signed(), 7);
        assert_eq!(1.5f32.widen(), 1.5f64);
    }

    #[test]
    fn kinds_group_integers() {
        assert_eq!(FormatArg::Signed(-1).kind(), "integer");
        assert_eq!(FormatArg::Unsigned(1).kind(), "integer");
        assert_eq!(FormatArg::Str("x").kind(), "string");
    }
}
