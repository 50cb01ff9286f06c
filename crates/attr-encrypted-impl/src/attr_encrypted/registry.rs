// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `EncryptedAttributes` implementation.
//!
//! The registry is built on first use inside a `LazyLock` and declares
//! every attribute in field order, so the runtime merge of hardcoded
//! defaults, type defaults and field overrides happens exactly once.
//!
//! Option lists become `OptionSet` builder chains. Dynamic values map as:
//!
//! | Written | Emitted |
//! |---------|---------|
//! | `key = "literal"` | `Dynamic::Literal(Into::into("literal"))` |
//! | `key = secret_key` | `Dynamic::method("secret_key", \|r\| Into::into(Record::secret_key(r)))` |
//! | `key = \|r\| ...` | `Dynamic::computed_into(\|r\| ...)` |

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Path, ext::IdentExt};

use super::parse::{DynamicArg, EncodeArg, MarshalerArg, OptionsArgs, RecordDef, SlotOrigin};

/// Emit `impl EncryptedAttributes for Record`.
pub fn generate(record: &RecordDef) -> TokenStream {
    let ident = record.ident();
    let defaults = option_set(&record.defaults, ident);

    let manual = record
        .attrs
        .iter()
        .filter(|a| a.slot.origin == SlotOrigin::Manual)
        .map(|a| a.slot.ident.unraw().to_string());

    let declarations = record.attrs.iter().map(|a| {
        let name = a.field.ident.unraw().to_string();
        let options = option_set(&a.field.overrides, ident);
        quote! { registry.declare(&[#name], #options); }
    });

    quote! {
        impl ::attr_encrypted::EncryptedAttributes for #ident {
            fn encrypted_attributes() -> &'static ::attr_encrypted::AttributeRegistry<Self> {
                static REGISTRY: ::std::sync::LazyLock<::attr_encrypted::AttributeRegistry<#ident>> =
                    ::std::sync::LazyLock::new(|| {
                        #[allow(unused_mut)]
                        let mut registry =
                            ::attr_encrypted::AttributeRegistry::<#ident>::with_defaults(#defaults);
                        #(registry.define_storage(#manual);)*
                        #(#declarations)*
                        registry
                    });
                &REGISTRY
            }
        }
    }
}

/// Builder chain reproducing one option list.
pub fn option_set(args: &OptionsArgs, record: &Ident) -> TokenStream {
    let mut calls = Vec::new();

    if let Some(attribute) = &args.attribute {
        calls.push(quote!(.attribute(#attribute)));
    }
    if let Some(prefix) = &args.prefix {
        calls.push(quote!(.prefix(#prefix)));
    }
    if let Some(suffix) = &args.suffix {
        calls.push(quote!(.suffix(#suffix)));
    }
    if let Some(key) = &args.key {
        let key = dynamic(key, record, quote!(::attr_encrypted::Key));
        calls.push(quote!(.dynamic_key(#key)));
    }
    if let Some(encode) = args.encode {
        let encode = encode_tokens(encode);
        calls.push(quote!(.encode(#encode)));
    }
    if let Some(marshal) = args.marshal {
        calls.push(quote!(.marshal(#marshal)));
    }
    if let Some(marshaler) = args.marshaler {
        let marshaler = match marshaler {
            MarshalerArg::Json => quote!(::attr_encrypted::Marshaler::Json),
            MarshalerArg::Postcard => quote!(::attr_encrypted::Marshaler::Postcard)
        };
        calls.push(quote!(.marshaler(#marshaler)));
    }
    if let Some(encryptor) = &args.encryptor {
        calls.push(quote!(.encryptor(#encryptor)));
    }
    if let Some(method) = &args.encrypt_method {
        calls.push(quote!(.encrypt_method(#method)));
    }
    if let Some(method) = &args.decrypt_method {
        calls.push(quote!(.decrypt_method(#method)));
    }
    if let Some(condition) = &args.condition {
        let condition = dynamic(condition, record, quote!(bool));
        calls.push(quote!(.condition(#condition)));
    }
    if let Some(unless) = &args.unless {
        let unless = dynamic(unless, record, quote!(bool));
        calls.push(quote!(.unless(#unless)));
    }
    for (name, value) in &args.extra {
        calls.push(quote!(.extra(#name, #value)));
    }

    quote! {
        ::attr_encrypted::OptionSet::<#record>::new() #(#calls)*
    }
}

fn dynamic(arg: &DynamicArg, record: &Ident, value_ty: TokenStream) -> TokenStream {
    let dynamic = quote!(::attr_encrypted::Dynamic::<#record, #value_ty>);
    match arg {
        DynamicArg::Literal(expr) => {
            quote!(#dynamic::Literal(::core::convert::Into::into(#expr)))
        }
        DynamicArg::Method(path) => {
            let name = path_name(path);
            let call = method_path(path, record);
            quote! {
                #dynamic::method(#name, |record: &#record| ::core::convert::Into::into(#call(record)))
            }
        }
        DynamicArg::Computed(closure) => quote!(#dynamic::computed_into(#closure))
    }
}

fn encode_tokens(encode: EncodeArg) -> TokenStream {
    let encoding = match encode {
        EncodeArg::Off => return quote!(::attr_encrypted::Encode::Off),
        EncodeArg::Base64 => quote!(Base64),
        EncodeArg::Base64Url => quote!(Base64Url),
        EncodeArg::Hex => quote!(Hex)
    };
    quote!(::attr_encrypted::Encode::With(::attr_encrypted::Encoding::#encoding))
}

/// Human-readable method name kept in `Dynamic::Method`.
fn path_name(path: &Path) -> String {
    path.segments
        .iter()
        .map(|s| s.ident.unraw().to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Callable path for a method option.
///
/// A bare identifier names an inherent method of the record. `Self::x`
/// is rewritten to `Record::x` because the registry lives in a static.
fn method_path(path: &Path, record: &Ident) -> TokenStream {
    if let Some(method) = path.get_ident() {
        return quote!(#record::#method);
    }
    let mut segments = path.segments.iter();
    if let Some(first) = segments.next()
        && first.ident == "Self"
        && path.leading_colon.is_none()
    {
        let rest = segments.map(|s| &s.ident);
        return quote!(#record #(::#rest)*);
    }
    quote!(#path)
}
