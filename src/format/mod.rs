//! Format string parsing and the cached [`FormatSpec`].

use crate::args::FormatArg;
use crate::derive::{ArgumentTypeChain, derive_types};
use crate::directive::Directive;
use crate::error::FormatError;
use crate::sink::Sink;

mod format_parser;

use format_parser::{DirectiveError, DirectiveErrorKind};

/// Parse a raw format string into its directive sequence.
///
/// Parsing is pure and deterministic: the same input always yields the same
/// sequence. Malformed `%`-sequences fail with
/// [`FormatError::InvalidDirective`]; the `#` flag fails with
/// [`FormatError::UnsupportedFlag`]. Errors are surfaced immediately and
/// never silently recovered.
pub fn parse_directives(raw: &str) -> Result<Vec<Directive>, FormatError> {
    match format_parser::directives(raw) {
        Ok((rest, directives)) => {
            if rest.is_empty() {
                Ok(directives)
            } else {
                Err(FormatError::InvalidDirective {
                    position: raw.len() - rest.len(),
                })
            }
        }
        Err(nom::Err::Failure(e)) | Err(nom::Err::Error(e)) => Err(to_format_error(raw, e)),
        Err(nom::Err::Incomplete(_)) => Err(FormatError::InvalidDirective {
            position: raw.len(),
        }),
    }
}

fn to_format_error(raw: &str, e: DirectiveError<'_>) -> FormatError {
    let position = raw.len() - e.input.len();
    match e.kind {
        DirectiveErrorKind::UnsupportedFlag(flag) => FormatError::UnsupportedFlag { flag, position },
        DirectiveErrorKind::InvalidDirective | DirectiveErrorKind::Nom(_) => {
            FormatError::InvalidDirective { position }
        }
    }
}

/// A parsed format string with its cached argument type chain.
///
/// Immutable after construction; parsing and derivation happen exactly once.
/// Values are freely shareable across threads — concurrent renders through
/// the same `FormatSpec` into distinct sinks need no coordination.
#[derive(Debug)]
pub struct FormatSpec {
    raw: Box<str>,
    directives: Vec<Directive>,
    chain: ArgumentTypeChain,
}

impl FormatSpec {
    /// Parse `raw` and derive its argument type chain.
    pub fn parse(raw: &str) -> Result<Self, FormatError> {
        let directives = parse_directives(raw)?;
        let chain = derive_types(&directives);
        Ok(Self {
            raw: raw.into(),
            directives,
            chain,
        })
    }

    /// The raw format string this spec was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed directive sequence, in argument consumption order.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// The derived argument type chain.
    pub fn chain(&self) -> &ArgumentTypeChain {
        &self.chain
    }

    /// Render `args` through `sink`.
    ///
    /// Arguments are validated against the derived chain before any byte is
    /// written, then consumed in strict left-to-right order.
    pub fn render(&self, args: &[FormatArg<'_>], sink: &mut dyn Sink) -> Result<(), FormatError> {
        self.chain.check(args)?;
        crate::render::render(&self.directives, args, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{Conversion, Placeholder, Precision, Width};

    #[test]
    fn parse_is_deterministic() {
        let a = parse_directives("%-6.2f %s done").unwrap();
        let b = parse_directives("%-6.2f %s done").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_directive_reports_position() {
        let err = parse_directives("ab %q").unwrap_err();
        let FormatError::InvalidDirective { position } = err else {
            panic!("expected InvalidDirective, got {err:?}");
        };
        assert_eq!(position, 4);
    }

    #[test]
    fn hash_flag_reports_flag_and_position() {
        let err = parse_directives("x %#d").unwrap_err();
        let FormatError::UnsupportedFlag { flag, position } = err else {
            panic!("expected UnsupportedFlag, got {err:?}");
        };
        assert_eq!(flag, '#');
        assert_eq!(position, 3);
    }

    #[test]
    fn spec_caches_directives_and_chain() {
        let spec = FormatSpec::parse("%s = %06.2f").unwrap();
        assert_eq!(spec.raw(), "%s = %06.2f");
        assert_eq!(spec.directives().len(), 3);
        assert_eq!(spec.chain().len(), 2);
        assert_eq!(
            spec.directives()[2],
            Directive::Placeholder(Placeholder {
                flags: crate::directive::FormatFlags {
                    zero_pad: true,
                    ..Default::default()
                },
                width: Width::Fixed(6),
                precision: Precision::Fixed(2),
                conversion: Conversion::FloatFixed { upper: false },
            })
        );
    }

    #[test]
    fn spec_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormatSpec>();
    }
}
