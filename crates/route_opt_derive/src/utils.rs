use quote::quote;
use syn::{AngleBracketedGenericArguments, GenericArgument, Path, PathArguments, Type, TypePath};

/// Returns `true` when `ty` is spelled `Name`, `std::<module>::Name` or
/// `core::<module>::Name`.
fn is_prelude_path(path: &Path, module: &str, name: &str) -> bool {
    match path.segments.len() {
        1 => path.segments[0].ident == name,
        3 => {
            (path.segments[0].ident == "std" || path.segments[0].ident == "core")
                && path.segments[1].ident == module
                && path.segments[2].ident == name
        }
        _ => false,
    }
}

pub fn inner_of_option(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { path, .. }) = ty else {
        return None;
    };
    if !is_prelude_path(path, "option", "Option") {
        return None;
    }

    if let Some(seg) = path.segments.last()
        && let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
            &seg.arguments
        && let Some(GenericArgument::Type(t)) = args.first()
    {
        return Some(t);
    }
    None
}

pub fn is_phantom_data(ty: &Type) -> bool {
    let Type::Path(TypePath { path, .. }) = ty else {
        return false;
    };
    if !is_prelude_path(path, "marker", "PhantomData") {
        return false;
    }

    path.segments
        .last()
        .is_some_and(|seg| matches!(seg.arguments, PathArguments::AngleBracketed(_)))
}

pub fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Path(TypePath { path, .. }) if path.is_ident("bool"))
}

/// Expression turning the local `raw: String` into a value of `ty`.
/// `Option<T>` fields are parsed as `T` and wrapped in `Some`.
pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    let (target, wrap) = match inner_of_option(ty) {
        Some(inner) => (inner, true),
        None => (ty, false),
    };

    let parsed = if let Some(parse_with) = parse_with {
        quote! { #parse_with(&raw)? }
    } else {
        quote! {
            raw.parse::<#target>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        }
    };

    if wrap {
        quote! { Some(#parsed) }
    } else {
        parsed
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}
