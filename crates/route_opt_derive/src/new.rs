use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, Type, parse_macro_input, spanned::Spanned};

use crate::utils;

enum Kind<'a> {
    /// Required constructor argument.
    Required { ident: &'a Ident, ty: &'a Type },
    /// Starts as `None`; `with_*` takes the inner value.
    Optional { ident: &'a Ident, inner: &'a Type },
    /// `_marker: PhantomData<_>` fields.
    Marker(&'a Ident),
}

pub fn derive_new_inner(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;
    let generics = input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    &name,
                    "`New` can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&name, "`New` can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let mut kinds = Vec::<Kind>::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if ident.to_string().starts_with('_') {
            if !utils::is_phantom_data(&field.ty) {
                return syn::Error::new(
                    field.span(),
                    "underscore-prefixed fields in `#[derive(New)]` must be `PhantomData<_>`",
                )
                .to_compile_error()
                .into();
            }
            kinds.push(Kind::Marker(ident));
        } else if let Some(inner) = utils::inner_of_option(&field.ty) {
            kinds.push(Kind::Optional { ident, inner });
        } else {
            kinds.push(Kind::Required {
                ident,
                ty: &field.ty,
            });
        }
    }

    let mut new_args = Vec::new();
    let mut inits = Vec::new();
    let mut builders = Vec::new();

    for kind in &kinds {
        match kind {
            Kind::Required { ident, ty } => {
                new_args.push(quote! { #ident: #ty });
                inits.push(quote! { #ident });
            }
            Kind::Optional { ident, inner } => {
                inits.push(quote! { #ident: None });
                let method = format_ident!("with_{}", ident);
                builders.push(quote! {
                    pub fn #method(mut self, #ident: #inner) -> Self {
                        self.#ident = Some(#ident);
                        self
                    }
                });
            }
            Kind::Marker(ident) => {
                inits.push(quote! { #ident: std::marker::PhantomData });
            }
        }
    }

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Auto-generated constructor.
            pub const fn new(#(#new_args),*) -> Self {
                Self { #(#inits),* }
            }

            #(#builders)*
        }
    };

    TokenStream::from(expanded)
}
