//! Implementation of `#[derive(NativeClass)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, parse_macro_input, spanned::Spanned};

use crate::attrs::{FieldAttrs, TypeAttrs};

pub fn derive_native_class_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_native_class_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_native_class_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "NativeClass cannot be derived for generic types",
        ));
    }

    let name = &input.ident;
    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    let script_name = attrs.name.clone().unwrap_or_else(|| name.to_string());

    let identity = generate_identity(name, &script_name);
    let codec = generate_codec(name, attrs.value);
    let fields = generate_fields(input)?;

    Ok(quote! {
        #identity
        #codec
        #fields
    })
}

/// `ScriptType` and `NativeClass`.
fn generate_identity(name: &syn::Ident, script_name: &str) -> TokenStream2 {
    quote! {
        impl ::scriptbind::ScriptType for #name {
            const KIND: ::scriptbind::TypeKind = ::scriptbind::TypeKind::Instance;

            fn type_name() -> &'static str {
                #script_name
            }
        }

        impl ::scriptbind::NativeClass for #name {}
    }
}

/// Returning always wraps; taking by value only for value classes.
fn generate_codec(name: &syn::Ident, value: bool) -> TokenStream2 {
    let from_value = value.then(|| {
        quote! {
            impl ::scriptbind::FromValue for #name {
                fn from_value(
                    value: &::scriptbind::Value,
                    instances: &::scriptbind::InstanceTable,
                ) -> ::core::result::Result<Self, ::scriptbind::ConversionError> {
                    ::scriptbind::instance_from_value(value, instances)
                }
            }
        }
    });

    quote! {
        impl ::scriptbind::IntoValue for #name {
            fn into_value(
                self,
                instances: &mut ::scriptbind::InstanceTable,
            ) -> ::core::result::Result<::scriptbind::Value, ::scriptbind::ConversionError> {
                ::core::result::Result::Ok(::scriptbind::instance_into_value(self, instances))
            }
        }

        #from_value
    }
}

/// `ScriptFields` binding every `#[script(get)]` / `#[script(set)]` field.
fn generate_fields(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let mut binds = Vec::new();

    if let Data::Struct(data) = &input.data {
        for (index, field) in data.fields.iter().enumerate() {
            let field_attrs = FieldAttrs::from_attrs(&field.attrs)?;
            if !field_attrs.is_exposed() {
                continue;
            }

            let Some(ident) = &field.ident else {
                return Err(syn::Error::new(
                    field.span(),
                    format!("field {index}: accessors need a named field"),
                ));
            };
            let accessor = field_attrs.name.clone().unwrap_or_else(|| ident.to_string());
            let ty = &field.ty;

            if field_attrs.get {
                binds.push(quote! {
                    let builder = builder.getter(#accessor, |this: &Self| -> #ty {
                        ::core::clone::Clone::clone(&this.#ident)
                    })?;
                });
            }
            if field_attrs.set {
                binds.push(quote! {
                    let builder = builder.setter(#accessor, |this: &mut Self, value: #ty| {
                        this.#ident = value;
                    })?;
                });
            }
        }
    } else if let Data::Enum(data) = &input.data {
        for variant in &data.variants {
            for field in &variant.fields {
                if FieldAttrs::from_attrs(&field.attrs)?.is_exposed() {
                    return Err(syn::Error::new(field.span(), "accessors are only supported on struct fields"));
                }
            }
        }
    }

    Ok(quote! {
        impl ::scriptbind::ScriptFields for #name {
            fn bind_fields<'a, V: ::scriptbind::HostVm>(
                builder: ::scriptbind::ClassBuilder<'a, Self, V>,
            ) -> ::core::result::Result<::scriptbind::ClassBuilder<'a, Self, V>, ::scriptbind::RegistrationError> {
                #(#binds)*
                ::core::result::Result::Ok(builder)
            }
        }
    })
}
