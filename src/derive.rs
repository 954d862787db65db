//! Type derivation: a static analysis mapping a directive sequence to the
//! ordered argument types its render will consume.
//!
//! The derivation never evaluates an argument value; it is computed once at
//! [`FormatSpec`](crate::FormatSpec) construction time and cached. The macro
//! layer performs the same walk at compile time, so call sites that pass the
//! wrong type fail to compile; the runtime path checks supplied
//! [`FormatArg`] values against the chain before rendering.

use crate::args::FormatArg;
use crate::directive::{Conversion, Directive, Precision, Width};
use crate::error::FormatError;

/// Semantic type of one argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Bool,
    Str,
    Char,
    /// Any basic integer; signedness and bit width are resolved by the
    /// calling context, not by the conversion. Also the type of `*`
    /// width/precision slots.
    Int,
    Float,
    Decimal,
    /// `%O` operand, rendered via `Display`.
    Display,
    /// `%A` operand, rendered via structural `Debug` layout.
    Structural,
    /// Function slot of `%a`.
    ContextFn,
    /// Operand slot of `%a`.
    ContextOperand,
    /// Function slot of `%t`.
    ActionFn,
}

impl ArgType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Char => "char",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Display => "display value",
            Self::Structural => "structural value",
            Self::ContextFn => "context function",
            Self::ContextOperand => "context operand",
            Self::ActionFn => "context action",
        }
    }

    pub(crate) fn accepts(self, arg: &FormatArg<'_>) -> bool {
        match self {
            Self::Bool => matches!(arg, FormatArg::Bool(_)),
            Self::Str => matches!(arg, FormatArg::Str(_)),
            Self::Char => matches!(arg, FormatArg::Char(_)),
            Self::Int => matches!(arg, FormatArg::Signed(_) | FormatArg::Unsigned(_)),
            Self::Float => matches!(arg, FormatArg::Float(_)),
            Self::Decimal => matches!(arg, FormatArg::Decimal(_)),
            Self::Display => matches!(arg, FormatArg::Display(_)),
            Self::Structural => matches!(arg, FormatArg::Structural(_)),
            Self::ContextFn => matches!(arg, FormatArg::With(_)),
            Self::ContextOperand => matches!(arg, FormatArg::Operand(_)),
            Self::ActionFn => matches!(arg, FormatArg::Action(_)),
        }
    }
}

/// Ordered argument slots derived from a directive sequence.
///
/// The terminal result type of the original chain is the generic return
/// parameter of the continuation entry points and does not appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentTypeChain {
    slots: Vec<ArgType>,
}

impl ArgumentTypeChain {
    pub fn slots(&self) -> &[ArgType] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Validate supplied arguments against the chain.
    pub fn check(&self, args: &[FormatArg<'_>]) -> Result<(), FormatError> {
        if args.len() != self.slots.len() {
            return Err(FormatError::ArgumentCountMismatch {
                expected: self.slots.len(),
                found: args.len(),
            });
        }
        for (index, (slot, arg)) in self.slots.iter().zip(args).enumerate() {
            if !slot.accepts(arg) {
                return Err(FormatError::ArgumentTypeMismatch {
                    index,
                    expected: slot.name(),
                    found: arg.kind(),
                });
            }
        }
        Ok(())
    }
}

/// Walk the directive sequence and derive the argument slots, in consumption
/// order. A `*` width/precision inserts an extra integer slot immediately
/// before the value's slot; `%a` contributes two slots, `%t` one.
pub fn derive_types(directives: &[Directive]) -> ArgumentTypeChain {
    let mut slots = Vec::new();
    for directive in directives {
        let Directive::Placeholder(ph) = directive else {
            continue;
        };
        if ph.width == Width::FromArg {
            slots.push(ArgType::Int);
        }
        if ph.precision == Precision::FromArg {
            slots.push(ArgType::Int);
        }
        match ph.conversion {
            Conversion::Bool => slots.push(ArgType::Bool),
            Conversion::Str => slots.push(ArgType::Str),
            Conversion::Char => slots.push(ArgType::Char),
            Conversion::SignedDec
            | Conversion::UnsignedDec
            | Conversion::HexLower
            | Conversion::HexUpper
            | Conversion::Octal => slots.push(ArgType::Int),
            Conversion::FloatExp { .. }
            | Conversion::FloatFixed { .. }
            | Conversion::FloatGeneral { .. } => slots.push(ArgType::Float),
            Conversion::Decimal => slots.push(ArgType::Decimal),
            Conversion::Display => slots.push(ArgType::Display),
            Conversion::Structural => slots.push(ArgType::Structural),
            Conversion::ContextWith => {
                slots.push(ArgType::ContextFn);
                slots.push(ArgType::ContextOperand);
            }
            Conversion::ContextAction => slots.push(ArgType::ActionFn),
        }
    }
    ArgumentTypeChain { slots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::parse_directives;

    fn chain_of(fmt: &str) -> ArgumentTypeChain {
        derive_types(&parse_directives(fmt).unwrap())
    }

    #[test]
    fn literal_only_chain_is_empty() {
        assert!(chain_of("just text, 100%%").is_empty());
    }

    #[test]
    fn conversion_table_maps_to_slots() {
        let chain = chain_of("%b %s %c %d %u %x %g %M %O %A");
        assert_eq!(
            chain.slots(),
            &[
                ArgType::Bool,
                ArgType::Str,
                ArgType::Char,
                ArgType::Int,
                ArgType::Int,
                ArgType::Int,
                ArgType::Float,
                ArgType::Decimal,
                ArgType::Display,
                ArgType::Structural,
            ]
        );
    }

    #[test]
    fn dynamic_width_inserts_int_slot_before_value() {
        let chain = chain_of("%*.*f");
        assert_eq!(
            chain.slots(),
            &[ArgType::Int, ArgType::Int, ArgType::Float]
        );
    }

    #[test]
    fn context_conversions_contribute_their_slots() {
        let chain = chain_of("%a and %t");
        assert_eq!(
            chain.slots(),
            &[
                ArgType::ContextFn,
                ArgType::ContextOperand,
                ArgType::ActionFn,
            ]
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(chain_of("%*d %s %a"), chain_of("%*d %s %a"));
    }

    #[test]
    fn check_reports_type_mismatch() {
        let chain = chain_of("%d");
        let err = chain.check(&[FormatArg::Str("7")]).unwrap_err();
        let FormatError::ArgumentTypeMismatch {
            index,
            expected,
            found,
        } = err
        else {
            panic!("expected type mismatch, got {err:?}");
        };
        assert_eq!((index, expected, found), (0, "integer", "string"));
    }

    #[test]
    fn check_reports_count_mismatch() {
        let chain = chain_of("%d %d");
        let err = chain.check(&[FormatArg::Signed(1)]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::ArgumentCountMismatch {
                expected: 2,
                found: 1,
            }
        ));
    }
}
