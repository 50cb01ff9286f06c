// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Struct rewriting.
//!
//! Re-emits the annotated struct without `#[encrypted]` markers and appends
//! one `Option<S>` field per generated storage slot. Manually declared slots
//! are left exactly as written.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Data, Field, FieldMutability, Fields, parse_quote};

use super::parse::{EncryptedAttr, RecordDef};

/// Emit the rewritten struct.
pub fn generate(record: &RecordDef) -> TokenStream {
    let mut item = record.input.clone();
    if let Data::Struct(data) = &mut item.data
        && let Fields::Named(named) = &mut data.fields
    {
        for attr in record.generated() {
            named.named.push(storage_field(attr));
        }
    }
    item.into_token_stream()
}

fn storage_field(attr: &EncryptedAttr) -> Field {
    let stored_ty = &attr.slot.ty;
    let doc = format!("Encrypted storage of `{}`.", attr.field.ident);

    Field {
        attrs:       vec![parse_quote!(#[doc = #doc])],
        vis:         attr.field.vis.clone(),
        mutability:  FieldMutability::None,
        ident:       Some(attr.slot.ident.clone()),
        colon_token: Some(Default::default()),
        ty:          parse_quote!(::core::option::Option<#stored_ty>)
    }
}
