use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_ident = input.ident.clone();

    let Data::Enum(data_enum) = input.data else {
        return syn::Error::new(input.span(), "CliValue can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut option_name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in &input.attrs {
        if !attr.path().is_ident("cli_value") {
            continue;
        }
        let parse_result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                option_name = lit.value();
                return Ok(());
            }
            Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
        });
        if let Err(err) = parse_result {
            return err.to_compile_error().into();
        }
    }

    let mut parse_arms = Vec::new();
    let mut display_arms = Vec::new();
    let mut canonical_values = Vec::new();
    let mut default_variant: Option<Ident> = None;

    for variant in data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(
                variant.span(),
                "CliValue only supports enums with unit variants",
            )
            .to_compile_error()
            .into();
        }

        let variant_ident = variant.ident;
        let mut canonical = utils::to_kebab_case(&variant_ident.to_string());
        let mut aliases: Vec<String> = Vec::new();
        let mut is_default = false;

        for attr in variant.attrs {
            if !attr.path().is_ident("cli") {
                continue;
            }
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    canonical = lit.value();
                    return Ok(());
                }
                if meta.path.is_ident("alias") {
                    let lit: LitStr = meta.value()?.parse()?;
                    aliases.push(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("default") {
                    is_default = true;
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected name/alias/default"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }

        if is_default {
            if default_variant.is_some() {
                return syn::Error::new(
                    variant_ident.span(),
                    "only one variant can be marked `#[cli(default)]`",
                )
                .to_compile_error()
                .into();
            }
            default_variant = Some(variant_ident.clone());
        }

        let canonical_lit = LitStr::new(&canonical, Span::call_site());
        let mut tokens = vec![canonical_lit.clone()];
        tokens.extend(aliases.iter().map(|v| LitStr::new(v, Span::call_site())));

        parse_arms.push(quote! {
            #(#tokens)|* => Ok(Self::#variant_ident),
        });
        display_arms.push(quote! {
            Self::#variant_ident => #canonical_lit,
        });
        canonical_values.push(canonical_lit);
    }

    let option_lit = LitStr::new(&option_name, Span::call_site());

    let default_impl = default_variant.map(|variant| {
        quote! {
            impl Default for #enum_ident {
                fn default() -> Self {
                    Self::#variant
                }
            }
        }
    });

    let expanded = quote! {
        impl #enum_ident {
            /// Canonical spellings accepted on the command line.
            pub const VALUES: &'static [&'static str] = &[#(#canonical_values),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        Self::VALUES.join("|")
                    ))),
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let value = match self {
                    #(#display_arms)*
                };
                write!(f, "{value}")
            }
        }

        #default_impl
    };

    TokenStream::from(expanded)
}
