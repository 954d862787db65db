//! Compile-time checked printf-style formatting.
//!
//! This crate provides the classic `%`-directive formatting family
//! (`sprintf!`, `printf!`, `fprintf!`, ...) with the format string parsed
//! and type-checked during compilation.
//!
//! # Architecture
//!
//! The engine is divided into four phases:
//! 1. **Directive parsing**: the format string is scanned into a sequence of
//!    literal-text and placeholder directives
//! 2. **Type derivation**: the directive sequence is mapped to the ordered
//!    argument types the render will consume
//! 3. **Rendering**: the same directive sequence is re-walked with resolved
//!    argument values, writing through a pluggable output sink
//! 4. **Continuation**: the finished output is optionally piped through a
//!    post-processing function before returning to the caller
//!
//! The implementation is organized into focused modules:
//! - `directive`: the parsed directive model (flags, width, precision,
//!   conversion)
//! - `format`: nom-based directive parser and the cached [`FormatSpec`]
//! - `derive`: the argument type chain derived from a directive sequence
//! - `args`: runtime argument values and the integer/float widening traits
//! - `render`: per-conversion rendering with POSIX width/flag semantics
//! - `sink`: output sinks (string accumulator, stream writer, text builder)
//! - `error`: the parse/render error taxonomy
//!
//! # Two binding layers
//!
//! The macros (re-exported from `printf-proc-macro`) parse the format string
//! literal at compile time and expand to concretely-typed calls into
//! [`render`], so a call site supplying the wrong argument type fails to
//! compile. The runtime API ([`FormatSpec`] plus [`FormatArg`] slices) parses
//! at run time and validates arguments against the derived
//! [`ArgumentTypeChain`] before rendering — the trade is static guarantees
//! for dynamic format strings.
//!
//! # Directive grammar
//!
//! `%[flags][width][.precision]<conversion>`
//!
//! - flags: `0` zero-pad, `-` left-justify, `+` force sign, ` ` space sign.
//!   The `#` flag is rejected at parse time.
//! - width/precision: decimal literal or `*`, which consumes one extra
//!   integer argument immediately before the value. A negative dynamic width
//!   left-justifies at the absolute width.
//! - conversions: `b` bool, `s` string, `c` char, `d`/`i` signed decimal,
//!   `u` unsigned decimal, `x`/`X` hex, `o` octal, `e`/`E` `f`/`F` `g`/`G`
//!   floats, `M` arbitrary-precision decimal, `O` display-based generic,
//!   `A` structural generic, `a`/`t` custom context functions, `%%` a
//!   literal percent.
//!
//! # Concurrency
//!
//! Parsing and type derivation are pure; a [`FormatSpec`] is immutable after
//! construction and freely shareable across threads. Rendering is
//! synchronous and assumes a single writer per sink; concurrent renders to
//! distinct sinks need no coordination.
//!
//! # Examples
//!
//! ```
//! use printf::sprintf;
//!
//! let line = sprintf!("%-8s %06.2f (%x)", "total", 3.14159f64, 255u32).unwrap();
//! assert_eq!(line, "total    003.14 (ff)");
//! ```

#![forbid(unsafe_code)]

// ============================================================================
// Module Organization
// ============================================================================

mod args;
mod derive;
mod directive;
mod error;
pub mod format;
pub mod render;
mod sink;

// ============================================================================
// Re-exports for Public API
// ============================================================================

pub use args::{ActionFn, ContextFn, FormatArg, FormatFloat, FormatInt};
pub use derive::{ArgType, ArgumentTypeChain, derive_types};
pub use directive::{Conversion, Directive, FormatFlags, Placeholder, Precision, Width};
pub use error::FormatError;
pub use format::{FormatSpec, parse_directives};
pub use rust_decimal::Decimal;
pub use sink::{Sink, StringSink, WriterSink};

pub use printf_proc_macro::{
    bprintf, eprintf, eprintfln, failwithf, fprintf, fprintfln, kbprintf, kfprintf, ksprintf,
    printf, printfln, sprintf,
};

// ============================================================================
// Runtime Entry Points
// ============================================================================

/// Render to an accumulated string.
pub fn sprintf(spec: &FormatSpec, args: &[FormatArg<'_>]) -> Result<String, FormatError> {
    let mut sink = StringSink::new();
    spec.render(args, &mut sink)?;
    Ok(sink.into_string())
}

/// Render to a sink.
pub fn fprintf(
    sink: &mut dyn Sink,
    spec: &FormatSpec,
    args: &[FormatArg<'_>],
) -> Result<(), FormatError> {
    spec.render(args, sink)
}

/// Render to a sink with a trailing line terminator.
pub fn fprintfln(
    sink: &mut dyn Sink,
    spec: &FormatSpec,
    args: &[FormatArg<'_>],
) -> Result<(), FormatError> {
    spec.render(args, sink)?;
    sink.write_str("\n")
}

/// Render by appending to a growable text builder.
pub fn bprintf(
    buffer: &mut String,
    spec: &FormatSpec,
    args: &[FormatArg<'_>],
) -> Result<(), FormatError> {
    spec.render(args, buffer)
}

/// Render to the process error stream.
pub fn eprintf(spec: &FormatSpec, args: &[FormatArg<'_>]) -> Result<(), FormatError> {
    let mut sink = WriterSink::stderr();
    spec.render(args, &mut sink)
}

/// Render to the process error stream with a trailing line terminator.
pub fn eprintfln(spec: &FormatSpec, args: &[FormatArg<'_>]) -> Result<(), FormatError> {
    let mut sink = WriterSink::stderr();
    fprintfln(&mut sink, spec, args)
}

/// Render to a string, then hand the finished string to `cont`.
///
/// The continuation runs exactly once, strictly after rendering completes;
/// it is never invoked when rendering fails.
pub fn ksprintf<R>(
    cont: impl FnOnce(String) -> R,
    spec: &FormatSpec,
    args: &[FormatArg<'_>],
) -> Result<R, FormatError> {
    sprintf(spec, args).map(cont)
}

/// Render to a sink, then hand the sink back to `cont`.
pub fn kfprintf<R>(
    cont: impl FnOnce(&mut dyn Sink) -> R,
    sink: &mut dyn Sink,
    spec: &FormatSpec,
    args: &[FormatArg<'_>],
) -> Result<R, FormatError> {
    spec.render(args, sink)?;
    Ok(cont(sink))
}

/// Render into a builder, then hand the builder back to `cont`.
pub fn kbprintf<R>(
    cont: impl FnOnce(&mut String) -> R,
    buffer: &mut String,
    spec: &FormatSpec,
    args: &[FormatArg<'_>],
) -> Result<R, FormatError> {
    spec.render(args, buffer)?;
    Ok(cont(buffer))
}

/// Render to a string and return it as a [`FormatError::Raised`] error.
///
/// The terminal variant: a successful render is deliberately converted into
/// a caller-visible abort condition carrying the rendered message.
pub fn failwithf<T>(spec: &FormatSpec, args: &[FormatArg<'_>]) -> Result<T, FormatError> {
    Err(FormatError::Raised(sprintf(spec, args)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(fmt: &str) -> FormatSpec {
        FormatSpec::parse(fmt).unwrap()
    }

    #[test]
    fn sprintf_renders_mixed_arguments() {
        let out = sprintf(
            &spec("%s scored %d (%05.1f%%)"),
            &[
                FormatArg::Str("alice"),
                FormatArg::Signed(42),
                FormatArg::Float(87.5),
            ],
        )
        .unwrap();
        assert_eq!(out, "alice scored 42 (087.5%)");
    }

    #[test]
    fn bprintf_appends_to_builder() {
        let mut buffer = String::from("log: ");
        bprintf(&mut buffer, &spec("%d"), &[FormatArg::Signed(7)]).unwrap();
        assert_eq!(buffer, "log: 7");
    }

    #[test]
    fn fprintfln_appends_terminator() {
        let mut sink = StringSink::new();
        fprintfln(&mut sink, &spec("%s"), &[FormatArg::Str("done")]).unwrap();
        assert_eq!(sink.as_str(), "done\n");
    }

    #[test]
    fn ksprintf_runs_continuation_once_after_render() {
        let mut calls = 0;
        let len = ksprintf(
            |s| {
                calls += 1;
                s.len()
            },
            &spec("%04d"),
            &[FormatArg::Signed(7)],
        )
        .unwrap();
        assert_eq!((len, calls), (4, 1));
    }

    #[test]
    fn ksprintf_skips_continuation_on_failure() {
        let mut calls = 0;
        let result = ksprintf(
            |_| calls += 1,
            &spec("%d"),
            &[FormatArg::Str("not an int")],
        );
        assert!(result.is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn failwithf_raises_the_rendered_message() {
        let err = failwithf::<()>(
            &spec("bad value: %d"),
            &[FormatArg::Signed(-3)],
        )
        .unwrap_err();
        let FormatError::Raised(message) = err else {
            panic!("expected Raised, got {err:?}");
        };
        assert_eq!(message, "bad value: -3");
    }
}
