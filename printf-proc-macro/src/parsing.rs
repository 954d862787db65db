//! Macro input parsing using syn.
//!
//! The twelve macros share three input shapes:
//! - `(format, args...)` for the string/stdout/stderr family
//! - `(target, format, args...)` for `fprintf!`-style destinations and the
//!   single-continuation `ksprintf!`/`failwithf!` forms
//! - `(cont, target, format, args...)` for the continuation-plus-destination
//!   forms

use syn::parse::{Parse, ParseStream};
use syn::{Expr, LitStr, Token};

/// `(format, args...)`
pub struct FormatArgs {
    pub format: LitStr,
    pub args: Vec<Expr>,
}

/// `(target, format, args...)` where `target` is a destination expression or
/// a continuation, depending on the macro.
pub struct TargetFormatArgs {
    pub target: Expr,
    pub format: LitStr,
    pub args: Vec<Expr>,
}

/// `(cont, target, format, args...)`
pub struct ContTargetFormatArgs {
    pub cont: Expr,
    pub target: Expr,
    pub format: LitStr,
    pub args: Vec<Expr>,
}

impl Parse for FormatArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let format: LitStr = input.parse()?;
        let args = parse_trailing_args(input)?;
        Ok(Self { format, args })
    }
}

impl Parse for TargetFormatArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let target: Expr = input.parse()?;
        input.parse::<Token![,]>()?;
        let FormatArgs { format, args } = input.parse()?;
        Ok(Self {
            target,
            format,
            args,
        })
    }
}

impl Parse for ContTargetFormatArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let cont: Expr = input.parse()?;
        input.parse::<Token![,]>()?;
        let TargetFormatArgs {
            target,
            format,
            args,
        } = input.parse()?;
        Ok(Self {
            cont,
            target,
            format,
            args,
        })
    }
}

/// Parse the comma-separated argument expressions after the format string.
/// Accepts a single trailing comma.
fn parse_trailing_args(input: ParseStream) -> syn::Result<Vec<Expr>> {
    let mut args = Vec::new();
    while input.peek(Token![,]) {
        input.parse::<Token![,]>()?;
        if input.is_empty() {
            break;
        }
        args.push(input.parse()?);
    }
    if !input.is_empty() {
        return Err(input.error("expected ',' between format arguments"));
    }
    Ok(args)
}
