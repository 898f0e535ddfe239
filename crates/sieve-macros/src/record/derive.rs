//! Code generation for `#[derive(Record)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, Ident, PathArguments,
    Result, Type,
};

use super::attrs::{parse_field_attrs, FieldKind};

pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => return Err(Error::new(input.span(), "Record can only be derived for structs")),
    };

    let mut arms = Vec::new();
    let mut constants = Vec::new();
    let mut names: Vec<String> = Vec::new();

    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let attr = parse_field_attrs(&field.attrs)?;
        let Some(kind) = attr.kind.filter(|_| !attr.skip) else {
            continue;
        };

        let name = attr.rename.unwrap_or_else(|| ident.to_string());
        if names.contains(&name) {
            return Err(Error::new(
                field.span(),
                format!("field name '{name}' is used by more than one field"),
            ));
        }
        let const_name = format_ident!("{}", to_screaming_snake_case(&name));
        constants.push(quote! {
            pub const #const_name: &'static str = #name;
        });

        let value = match option_inner(&field.ty) {
            Some(_) => {
                let read = read_value(kind, &format_ident!("value"), true);
                quote! {
                    match &self.#ident {
                        ::core::option::Option::Some(value) => #read,
                        ::core::option::Option::None => ::sieve::Value::Null,
                    }
                }
            }
            None => read_value(kind, ident, false),
        };
        arms.push(quote! { #name => #value, });
        names.push(name);
    }

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#constants)*
        }

        impl #impl_generics ::sieve::Record for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::sieve::Value<'_> {
                match field {
                    #(#arms)*
                    _ => ::sieve::Value::Null,
                }
            }
        }
    })
}

/// Expression reading one field. `binding` is either a field of `self` or,
/// for optional fields, a local reference to the inner value.
fn read_value(kind: FieldKind, binding: &Ident, local: bool) -> TokenStream {
    let place = if local {
        quote! { #binding }
    } else {
        quote! { &self.#binding }
    };
    match kind {
        FieldKind::Text => quote! {
            ::sieve::Value::Text(::core::convert::AsRef::<str>::as_ref(#place))
        },
        FieldKind::Number => quote! {
            ::sieve::Value::Number(::sieve::Number::from(*#place))
        },
        FieldKind::Timestamp => quote! {
            ::sieve::Value::Timestamp(::sieve::RecordTimestamp::record_timestamp(#place))
        },
        FieldKind::Bool => quote! {
            ::sieve::Value::Bool(*#place)
        },
    }
}

/// Returns `T` when `ty` is spelled `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
