//! Code generation: expand tokenized format strings into render statements.
//!
//! Each placeholder becomes a concretely-typed call into the runtime crate's
//! `render` module, with integer and float arguments funneled through the
//! widening traits. The argument walk here mirrors the runtime type
//! derivation exactly: a `*` width or precision consumes one extra integer
//! argument before the value, `%a` consumes a function and an operand, `%t`
//! a function.

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Expr, LitStr};

use crate::tokenization::tokenize_format_string;
use crate::types::{FormatToken, PlaceholderSpec, SpecNumber};

/// Expand a format string literal plus its argument expressions into the
/// body statements of a render closure over `sink: &mut dyn Sink`.
///
/// With `newline` set, a line terminator write is appended after the last
/// directive.
pub fn generate_render_statements(
    format_lit: &LitStr,
    args: &[Expr],
    newline: bool,
) -> Result<Vec<TokenStream>, syn::Error> {
    let format_str = format_lit.value();
    let tokens = tokenize_format_string(&format_str, format_lit)?;

    let mut stmts = Vec::with_capacity(tokens.len() + 1);
    let mut next_arg = 0usize;
    for token in &tokens {
        match token {
            FormatToken::Text(text) => {
                let lit = LitStr::new(text, format_lit.span());
                stmts.push(quote! {
                    ::printf::Sink::write_str(sink, #lit)?;
                });
            }
            FormatToken::Placeholder(spec) => {
                stmts.push(generate_placeholder(spec, args, &mut next_arg, format_lit)?);
            }
        }
    }
    if newline {
        stmts.push(quote! {
            ::printf::Sink::write_str(sink, "\n")?;
        });
    }

    if next_arg < args.len() {
        return Err(syn::Error::new(
            args[next_arg].span(),
            format!(
                "too many arguments: format string consumes {next_arg}, {} supplied",
                args.len()
            ),
        ));
    }

    Ok(stmts)
}

/// Take the next argument expression, or report which placeholder slot went
/// unfilled.
fn take_arg<'a>(
    args: &'a [Expr],
    next_arg: &mut usize,
    spec: &PlaceholderSpec,
    needed: &str,
    format_lit: &LitStr,
) -> Result<&'a Expr, syn::Error> {
    let Some(arg) = args.get(*next_arg) else {
        return Err(syn::Error::new(
            format_lit.span(),
            format!(
                "missing argument: '%{}' at byte {} needs {needed} (argument {})",
                spec.conversion,
                spec.offset,
                *next_arg + 1
            ),
        ));
    };
    *next_arg += 1;
    Ok(arg)
}

fn generate_placeholder(
    spec: &PlaceholderSpec,
    args: &[Expr],
    next_arg: &mut usize,
    format_lit: &LitStr,
) -> Result<TokenStream, syn::Error> {
    // Context conversions bypass the placeholder entirely: the supplied
    // function controls its own output. Dynamic width/precision arguments
    // are still consumed to keep slot order aligned with the runtime chain.
    if spec.conversion == 'a' || spec.conversion == 't' {
        let mut consumed = Vec::new();
        if spec.width == SpecNumber::FromArg {
            let w = take_arg(args, next_arg, spec, "a width", format_lit)?;
            consumed.push(quote! { let _ = ::printf::FormatInt::widen_signed(#w); });
        }
        if spec.precision == SpecNumber::FromArg {
            let p = take_arg(args, next_arg, spec, "a precision", format_lit)?;
            consumed.push(quote! { let _ = ::printf::FormatInt::widen_signed(#p); });
        }
        let call = if spec.conversion == 'a' {
            let func = take_arg(args, next_arg, spec, "a context function", format_lit)?;
            let operand = take_arg(args, next_arg, spec, "a context operand", format_lit)?;
            quote! { (#func)(sink, &#operand)?; }
        } else {
            let func = take_arg(args, next_arg, spec, "a context action", format_lit)?;
            quote! { (#func)(sink)?; }
        };
        return Ok(quote! {
            {
                #(#consumed)*
                #call
            }
        });
    }

    let ctor = placeholder_ctor(spec);
    let mut dynamic = Vec::new();
    if spec.width == SpecNumber::FromArg {
        let w = take_arg(args, next_arg, spec, "a width", format_lit)?;
        dynamic.push(quote! {
            spec.set_dynamic_width(::printf::FormatInt::widen_signed(#w));
        });
    }
    if spec.precision == SpecNumber::FromArg {
        let p = take_arg(args, next_arg, spec, "a precision", format_lit)?;
        dynamic.push(quote! {
            spec.set_dynamic_precision(::printf::FormatInt::widen_signed(#p));
        });
    }
    let binding = if dynamic.is_empty() {
        quote! { let spec = #ctor; }
    } else {
        quote! {
            let mut spec = #ctor;
            #(#dynamic)*
        }
    };

    let call = match spec.conversion {
        'b' => {
            let arg = take_arg(args, next_arg, spec, "a bool", format_lit)?;
            quote! { ::printf::render::fmt_bool(sink, &spec, #arg)?; }
        }
        's' => {
            let arg = take_arg(args, next_arg, spec, "a string", format_lit)?;
            quote! {
                ::printf::render::fmt_str(
                    sink,
                    &spec,
                    ::core::convert::AsRef::<str>::as_ref(&#arg),
                )?;
            }
        }
        'c' => {
            let arg = take_arg(args, next_arg, spec, "a char", format_lit)?;
            quote! { ::printf::render::fmt_char(sink, &spec, #arg)?; }
        }
        'd' | 'i' => {
            let arg = take_arg(args, next_arg, spec, "an integer", format_lit)?;
            quote! {
                ::printf::render::fmt_signed(
                    sink,
                    &spec,
                    ::printf::FormatInt::widen_signed(#arg),
                )?;
            }
        }
        'u' | 'x' | 'X' | 'o' => {
            let arg = take_arg(args, next_arg, spec, "an unsigned integer", format_lit)?;
            quote! {
                ::printf::render::fmt_unsigned(
                    sink,
                    &spec,
                    ::printf::FormatInt::widen_unsigned(#arg),
                )?;
            }
        }
        'e' | 'E' | 'f' | 'F' | 'g' | 'G' => {
            let arg = take_arg(args, next_arg, spec, "a float", format_lit)?;
            quote! {
                ::printf::render::fmt_float(
                    sink,
                    &spec,
                    ::printf::FormatFloat::widen(#arg),
                )?;
            }
        }
        'M' => {
            let arg = take_arg(args, next_arg, spec, "a decimal", format_lit)?;
            quote! { ::printf::render::fmt_decimal(sink, &spec, #arg)?; }
        }
        'O' => {
            let arg = take_arg(args, next_arg, spec, "a display value", format_lit)?;
            quote! { ::printf::render::fmt_display(sink, &spec, &#arg)?; }
        }
        'A' => {
            let arg = take_arg(args, next_arg, spec, "a debug value", format_lit)?;
            quote! { ::printf::render::fmt_structural(sink, &spec, &#arg)?; }
        }
        // Tokenization validated the conversion character already.
        other => {
            return Err(syn::Error::new(
                format_lit.span(),
                format!("internal error: unhandled conversion '{other}'"),
            ));
        }
    };

    Ok(quote! {
        {
            #binding
            #call
        }
    })
}

/// Inline constructor expression for the runtime placeholder.
fn placeholder_ctor(spec: &PlaceholderSpec) -> TokenStream {
    let zero_pad = spec.zero_pad;
    let left_justify = spec.left_justify;
    let force_sign = spec.force_sign;
    let space_sign = spec.space_sign;
    let width = spec_number_tokens(spec.width, quote!(::printf::Width));
    let precision = spec_number_tokens(spec.precision, quote!(::printf::Precision));
    let conversion = conversion_tokens(spec.conversion);
    quote! {
        ::printf::Placeholder {
            flags: ::printf::FormatFlags {
                zero_pad: #zero_pad,
                left_justify: #left_justify,
                force_sign: #force_sign,
                space_sign: #space_sign,
            },
            width: #width,
            precision: #precision,
            conversion: #conversion,
        }
    }
}

fn spec_number_tokens(number: SpecNumber, path: TokenStream) -> TokenStream {
    match number {
        SpecNumber::None => quote! { #path::None },
        SpecNumber::Fixed(n) => quote! { #path::Fixed(#n) },
        // Dynamic values are patched in via set_dynamic_* before rendering.
        SpecNumber::FromArg => quote! { #path::None },
    }
}

fn conversion_tokens(conversion: char) -> TokenStream {
    match conversion {
        'b' => quote!(::printf::Conversion::Bool),
        's' => quote!(::printf::Conversion::Str),
        'c' => quote!(::printf::Conversion::Char),
        'd' | 'i' => quote!(::printf::Conversion::SignedDec),
        'u' => quote!(::printf::Conversion::UnsignedDec),
        'x' => quote!(::printf::Conversion::HexLower),
        'X' => quote!(::printf::Conversion::HexUpper),
        'o' => quote!(::printf::Conversion::Octal),
        'e' => quote!(::printf::Conversion::FloatExp { upper: false }),
        'E' => quote!(::printf::Conversion::FloatExp { upper: true }),
        'f' => quote!(::printf::Conversion::FloatFixed { upper: false }),
        'F' => quote!(::printf::Conversion::FloatFixed { upper: true }),
        'g' => quote!(::printf::Conversion::FloatGeneral { upper: false }),
        'G' => quote!(::printf::Conversion::FloatGeneral { upper: true }),
        'M' => quote!(::printf::Conversion::Decimal),
        'O' => quote!(::printf::Conversion::Display),
        'A' => quote!(::printf::Conversion::Structural),
        _ => quote!(::printf::Conversion::Str),
    }
}
