//! Procedural macros for gatherx
//!
//! This crate provides the `#[timed]` attribute macro, which wraps a function body in a
//! measurement and reports the elapsed time every time the function returns.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenTree};
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Expr, Ident, ItemFn, LitStr, ReturnType, Type};

/// Attribute macro that times every call of a function.
///
/// Apply this to a free function or a method (sync or async). Each call:
/// - Starts a monotonic stopwatch
/// - Runs the original body unchanged (`return` and `?` keep their meaning)
/// - Reports `function <name> took <secs>s to execute` to the sink
/// - Returns the body's value to the caller
///
/// # Arguments
///
/// - `name = "label"`: report under `label` instead of the function's identifier
/// - `sink = EXPR`: report to `EXPR` (anything implementing `gatherx::Report`) instead of
///   standard output. `EXPR` is borrowed, so a `static` works.
///
/// # Fallible Functions
///
/// When the declared return type is a `Result` (any path whose last segment is `Result`,
/// such as `Result<T, E>` or `io::Result<T>`), the report is emitted only for `Ok`. An `Err`
/// is returned to the caller without a timing line.
///
/// ```ignore
/// use gatherx::timed;
///
/// #[timed]
/// fn parse_port(s: &str) -> Result<u16, std::num::ParseIntError> {
///     s.parse()
/// }
///
/// parse_port("8080").unwrap(); // Prints: function parse_port took 0.000s to execute
/// parse_port("http").unwrap_err(); // Prints nothing
/// ```
///
/// # Async Functions
///
/// ```ignore
/// use gatherx::timed;
///
/// #[timed(name = "download")]
/// async fn fetch_page(url: &str) -> usize {
///     url.len()
/// }
/// ```
///
/// # Custom Sink
///
/// ```ignore
/// use gatherx::{timed, Recorder};
///
/// static TIMINGS: Recorder = Recorder::new();
///
/// #[timed(sink = TIMINGS)]
/// fn step() {}
///
/// step();
/// assert_eq!(TIMINGS.len(), 1);
/// ```
///
/// # Requirements
///
/// - The item must be a function with a body
/// - `const fn` is not supported
/// - The return type must not contain `impl Trait`
///
/// # Generated Code
///
/// ```ignore
/// // Your code:
/// #[timed]
/// fn add(a: i32, b: i32) -> i32 {
///     a + b
/// }
///
/// // Generated:
/// fn add(a: i32, b: i32) -> i32 {
///     let watch = ::gatherx::Stopwatch::start();
///     let output: i32 = ::gatherx::timing::__private::call_once(move || -> i32 { a + b });
///     ::gatherx::Report::report(&::gatherx::Stdout, &watch.stop("add"));
///     output
/// }
/// ```
#[proc_macro_attribute]
pub fn timed(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut name: Option<LitStr> = None;
    let mut sink: Option<Expr> = None;

    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("sink") {
            sink = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error(
                "unsupported #[timed] argument\n\n\
                 Expected `name = \"label\"` or `sink = EXPR`.",
            ))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let function = parse_macro_input!(item as ItemFn);

    if let Some(constness) = &function.sig.constness {
        return syn::Error::new_spanned(
            constness,
            "#[timed] cannot be applied to a const fn\n\n\
             Reading the clock is not possible in a const context.",
        )
        .to_compile_error()
        .into();
    }

    // Extract return type
    let output_type: Type = match &function.sig.output {
        ReturnType::Default => syn::parse_quote!(()),
        ReturnType::Type(_, ty) => {
            if contains_impl_trait(ty.to_token_stream()) {
                return syn::Error::new_spanned(
                    ty,
                    "#[timed] does not support `impl Trait` return types\n\n\
                     The body is wrapped in a closure whose return type must be nameable.\n\
                     Return a concrete type or a boxed trait object instead.",
                )
                .to_compile_error()
                .into();
            }
            (**ty).clone()
        }
    };

    let report_name =
        name.unwrap_or_else(|| LitStr::new(&function.sig.ident.to_string(), Span::call_site()));
    let sink = match sink {
        Some(expr) => quote! { &(#expr) },
        None => quote! { &::gatherx::Stdout },
    };

    let watch = Ident::new("__gatherx_watch", Span::mixed_site());
    let output = Ident::new("__gatherx_output", Span::mixed_site());

    let block = &function.block;
    let run_body = if function.sig.asyncness.is_some() {
        quote! {
            ::gatherx::timing::__private::expect_output::<#output_type, _>(async move #block).await
        }
    } else {
        quote! { ::gatherx::timing::__private::call_once(move || -> #output_type #block) }
    };

    let report = quote! {
        ::gatherx::Report::report(#sink, &#watch.stop(#report_name));
    };
    let report = if returns_result(&output_type) {
        quote! {
            if ::core::result::Result::is_ok(&#output) {
                #report
            }
        }
    } else {
        report
    };

    let attrs = &function.attrs;
    let vis = &function.vis;
    let sig = &function.sig;

    quote! {
        #(#attrs)*
        #vis #sig {
            let #watch = ::gatherx::Stopwatch::start();
            let #output: #output_type = #run_body;
            #report
            #output
        }
    }
    .into()
}

fn returns_result(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Result"),
        Type::Group(group) => returns_result(&group.elem),
        Type::Paren(paren) => returns_result(&paren.elem),
        _ => false,
    }
}

fn contains_impl_trait(tokens: proc_macro2::TokenStream) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => ident == "impl",
        TokenTree::Group(group) => contains_impl_trait(group.stream()),
        _ => false,
    })
}
