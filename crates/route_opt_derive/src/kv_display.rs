use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "KvDisplay can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "KvDisplay requires named fields")
            .to_compile_error()
            .into();
    };

    let mut keys = Vec::new();
    let mut vals = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let key = field_ident.to_string();
        let mut optional_mode = None::<String>;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("kv")) {
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("fmt") {
                    let lit: LitStr = meta.value()?.parse()?;
                    optional_mode = Some(lit.value());
                    return Ok(());
                }
                Err(meta.error("unsupported kv attribute; expected fmt"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }

        // Every value is rendered to a String so `None` can print as `-`.
        let val = match optional_mode.as_deref() {
            None => quote! { self.#field_ident.to_string() },
            Some("opt") => quote! {
                self.#field_ident
                    .as_ref()
                    .map_or_else(|| String::from("-"), |v| v.to_string())
            },
            Some("opt_path") => quote! {
                self.#field_ident
                    .as_ref()
                    .map_or_else(|| String::from("-"), |v| v.display().to_string())
            },
            Some(other) => {
                return syn::Error::new(
                    field.span(),
                    format!("unsupported kv fmt mode: {other}; expected opt or opt_path"),
                )
                .to_compile_error()
                .into();
            }
        };
        keys.push(key);
        vals.push(val);
    }

    let longest = keys.iter().map(String::len).max().unwrap_or(0);
    let format_parts: Vec<String> = keys
        .iter()
        .map(|key| format!("\t{key:<longest$} = {{}}"))
        .collect();
    let format_lit = LitStr::new(&format!("\n{}", format_parts.join("\n")), Span::call_site());

    let expanded = quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #format_lit, #(#vals),*)
            }
        }
    };

    TokenStream::from(expanded)
}
