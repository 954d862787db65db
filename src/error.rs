//! Error taxonomy for parsing and rendering.

use std::io;

/// Errors surfaced by the format engine.
///
/// Parse-time errors (`InvalidDirective`, `UnsupportedFlag`) are reported
/// immediately and never silently recovered. The argument mismatch variants
/// only occur on the runtime variadic path; the macro layer turns the same
/// conditions into compile errors. `SinkWrite` aborts the in-progress render;
/// bytes already written to the sink are not rolled back.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Malformed `%`-sequence at the given byte offset of the format string.
    #[error("invalid format directive at byte {position}")]
    InvalidDirective { position: usize },

    /// A recognized but unsupported flag (currently only `#`).
    #[error("unsupported flag {flag:?} at byte {position}")]
    UnsupportedFlag { flag: char, position: usize },

    /// An argument value did not match the derived type chain.
    #[error("argument {index} has type {found}, expected {expected}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Wrong number of arguments for the derived type chain.
    #[error("format string consumes {expected} argument(s), {found} supplied")]
    ArgumentCountMismatch { expected: usize, found: usize },

    /// The underlying sink failed; fatal to the render, no partial retry.
    #[error("sink write failed: {0}")]
    SinkWrite(#[from] io::Error),

    /// The terminal `failwithf` variant: a successful render deliberately
    /// converted into a caller-visible error carrying the rendered message.
    #[error("{0}")]
    Raised(String),
}
