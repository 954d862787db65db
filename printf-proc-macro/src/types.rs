//! Core types for the compile-time view of a format string.
//!
//! These mirror the runtime crate's directive model but carry source byte
//! offsets for diagnostics. They exist only during macro expansion, so
//! clarity wins over runtime performance.

/// Width or precision of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecNumber {
    None,
    Fixed(usize),
    /// `*`: consumed as an extra integer argument at render time.
    FromArg,
}

/// A placeholder parsed from the format string literal.
///
/// Flag precedence (`+` over space, `-` cancels `0`) is already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpec {
    pub zero_pad: bool,
    pub left_justify: bool,
    pub force_sign: bool,
    pub space_sign: bool,
    pub width: SpecNumber,
    pub precision: SpecNumber,
    /// Conversion character, validated against the supported table.
    pub conversion: char,
    /// Byte offset of the introducing `%`, for diagnostics.
    pub offset: usize,
}

/// Token type for compile-time tokenization of format strings.
#[derive(Debug, Clone)]
pub enum FormatToken {
    /// A literal text run emitted verbatim. `%%` collapses into text.
    Text(Box<str>),

    /// A placeholder consuming one or more arguments.
    Placeholder(PlaceholderSpec),
}
