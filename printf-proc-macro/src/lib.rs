//! Procedural macro implementation for the `printf` crate.
//!
//! Each macro parses its format string literal at expansion time, validates
//! the directive grammar, and expands to a render closure over
//! `&mut dyn Sink` built from concretely-typed calls into `printf::render`.
//! Argument type errors therefore surface as ordinary compile errors at the
//! call site, and the format string is never re-parsed at run time.
//!
//! This crate is an implementation detail: depend on `printf` and use the
//! re-exported macros from there.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse_macro_input;

mod codegen;
mod constants;
mod parsing;
mod tokenization;
mod types;

use codegen::generate_render_statements;
use parsing::{ContTargetFormatArgs, FormatArgs, TargetFormatArgs};

/// Build the render closure expression shared by every expansion.
fn render_closure(stmts: &[TokenStream2]) -> TokenStream2 {
    quote! {
        |sink: &mut dyn ::printf::Sink| -> ::core::result::Result<(), ::printf::FormatError> {
            #(#stmts)*
            ::core::result::Result::Ok(())
        }
    }
}

fn expand_format_only(
    input: TokenStream,
    newline: bool,
    finish: impl FnOnce(TokenStream2) -> TokenStream2,
) -> TokenStream {
    let parsed = parse_macro_input!(input as FormatArgs);
    let stmts = match generate_render_statements(&parsed.format, &parsed.args, newline) {
        Ok(stmts) => stmts,
        Err(error) => return error.to_compile_error().into(),
    };
    finish(render_closure(&stmts)).into()
}

/// Format into a new `String`.
///
/// Returns `Result<String, FormatError>`.
///
/// # Examples
///
/// ```ignore
/// let line = sprintf!("%s has %d items", name, count)?;
/// ```
#[proc_macro]
pub fn sprintf(input: TokenStream) -> TokenStream {
    expand_format_only(input, false, |render| {
        quote! {
            {
                let render = #render;
                let mut sink = ::printf::StringSink::new();
                match render(&mut sink) {
                    ::core::result::Result::Ok(()) => {
                        ::core::result::Result::Ok(sink.into_string())
                    }
                    ::core::result::Result::Err(error) => ::core::result::Result::Err(error),
                }
            }
        }
    })
}

/// Format to standard output.
///
/// Returns `Result<(), FormatError>`.
#[proc_macro]
pub fn printf(input: TokenStream) -> TokenStream {
    expand_format_only(input, false, stdout_expansion)
}

/// Format to standard output with a trailing line terminator.
#[proc_macro]
pub fn printfln(input: TokenStream) -> TokenStream {
    expand_format_only(input, true, stdout_expansion)
}

fn stdout_expansion(render: TokenStream2) -> TokenStream2 {
    quote! {
        {
            let render = #render;
            let mut sink = ::printf::WriterSink::stdout();
            render(&mut sink)
        }
    }
}

/// Format to standard error.
#[proc_macro]
pub fn eprintf(input: TokenStream) -> TokenStream {
    expand_format_only(input, false, stderr_expansion)
}

/// Format to standard error with a trailing line terminator.
#[proc_macro]
pub fn eprintfln(input: TokenStream) -> TokenStream {
    expand_format_only(input, true, stderr_expansion)
}

fn stderr_expansion(render: TokenStream2) -> TokenStream2 {
    quote! {
        {
            let render = #render;
            let mut sink = ::printf::WriterSink::stderr();
            render(&mut sink)
        }
    }
}

fn expand_with_target(
    input: TokenStream,
    newline: bool,
    finish: impl FnOnce(TokenStream2, &syn::Expr) -> TokenStream2,
) -> TokenStream {
    let parsed = parse_macro_input!(input as TargetFormatArgs);
    let stmts = match generate_render_statements(&parsed.format, &parsed.args, newline) {
        Ok(stmts) => stmts,
        Err(error) => return error.to_compile_error().into(),
    };
    finish(render_closure(&stmts), &parsed.target).into()
}

/// Format to an `io::Write` destination.
///
/// The destination is wrapped in a `WriterSink`; write failures surface as
/// `FormatError::SinkWrite`.
///
/// ```ignore
/// fprintf!(&mut file, "%d bytes\n", len)?;
/// ```
#[proc_macro]
pub fn fprintf(input: TokenStream) -> TokenStream {
    expand_with_target(input, false, writer_expansion)
}

/// Format to an `io::Write` destination with a trailing line terminator.
#[proc_macro]
pub fn fprintfln(input: TokenStream) -> TokenStream {
    expand_with_target(input, true, writer_expansion)
}

fn writer_expansion(render: TokenStream2, target: &syn::Expr) -> TokenStream2 {
    quote! {
        {
            let render = #render;
            let mut sink = ::printf::WriterSink::new(#target);
            render(&mut sink)
        }
    }
}

/// Format by appending to a `&mut String` builder.
#[proc_macro]
pub fn bprintf(input: TokenStream) -> TokenStream {
    expand_with_target(input, false, |render, target| {
        quote! {
            {
                let render = #render;
                let buffer: &mut ::std::string::String = #target;
                render(&mut *buffer)
            }
        }
    })
}

/// Format into a new `String`, then pass it to a continuation.
///
/// `ksprintf!(cont, format, args...)` returns `Result<R, FormatError>` where
/// `R` is the continuation's return type. The continuation runs exactly once,
/// strictly after rendering completes, and never runs on failure.
#[proc_macro]
pub fn ksprintf(input: TokenStream) -> TokenStream {
    expand_with_target(input, false, |render, cont| {
        quote! {
            {
                let render = #render;
                let mut sink = ::printf::StringSink::new();
                match render(&mut sink) {
                    ::core::result::Result::Ok(()) => {
                        ::core::result::Result::Ok((#cont)(sink.into_string()))
                    }
                    ::core::result::Result::Err(error) => ::core::result::Result::Err(error),
                }
            }
        }
    })
}

fn expand_with_cont_and_target(
    input: TokenStream,
    finish: impl FnOnce(TokenStream2, &syn::Expr, &syn::Expr) -> TokenStream2,
) -> TokenStream {
    let parsed = parse_macro_input!(input as ContTargetFormatArgs);
    let stmts = match generate_render_statements(&parsed.format, &parsed.args, false) {
        Ok(stmts) => stmts,
        Err(error) => return error.to_compile_error().into(),
    };
    finish(render_closure(&stmts), &parsed.cont, &parsed.target).into()
}

/// Format to an `io::Write` destination, then pass the sink to a
/// continuation.
///
/// `kfprintf!(cont, target, format, args...)`: the continuation receives the
/// `&mut WriterSink` after all directives rendered, and its return value
/// becomes the `Ok` payload.
#[proc_macro]
pub fn kfprintf(input: TokenStream) -> TokenStream {
    expand_with_cont_and_target(input, |render, cont, target| {
        quote! {
            {
                let render = #render;
                let mut sink = ::printf::WriterSink::new(#target);
                match render(&mut sink) {
                    ::core::result::Result::Ok(()) => {
                        ::core::result::Result::Ok((#cont)(&mut sink))
                    }
                    ::core::result::Result::Err(error) => ::core::result::Result::Err(error),
                }
            }
        }
    })
}

/// Format into a `&mut String` builder, then pass the builder to a
/// continuation.
#[proc_macro]
pub fn kbprintf(input: TokenStream) -> TokenStream {
    expand_with_cont_and_target(input, |render, cont, target| {
        quote! {
            {
                let render = #render;
                let buffer: &mut ::std::string::String = #target;
                match render(&mut *buffer) {
                    ::core::result::Result::Ok(()) => {
                        ::core::result::Result::Ok((#cont)(buffer))
                    }
                    ::core::result::Result::Err(error) => ::core::result::Result::Err(error),
                }
            }
        }
    })
}

/// Format into a message and return it as a `FormatError::Raised` error.
///
/// `failwithf!(format, args...)` always evaluates to `Err`: the rendered
/// message on success, or the render failure itself.
///
/// ```ignore
/// return failwithf!("unexpected token %s at line %d", token, line);
/// ```
#[proc_macro]
pub fn failwithf(input: TokenStream) -> TokenStream {
    expand_format_only(input, false, |render| {
        quote! {
            {
                let render = #render;
                let mut sink = ::printf::StringSink::new();
                match render(&mut sink) {
                    ::core::result::Result::Ok(()) => ::core::result::Result::Err(
                        ::printf::FormatError::Raised(sink.into_string()),
                    ),
                    ::core::result::Result::Err(error) => ::core::result::Result::Err(error),
                }
            }
        }
    })
}
