// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[attr_encrypted]` expansion.
//!
//! ```text
//! RecordDef::parse ─┬─▶ storage::generate     struct + generated slots
//!                   ├─▶ accessors::generate   impl Record { email(), set_email(), ... }
//!                   └─▶ registry::generate    impl EncryptedAttributes for Record
//! ```

mod accessors;
pub mod parse;
mod registry;
mod storage;


use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::RecordDef;

/// Main entry point for the `attr_encrypted` attribute macro.
pub fn expand(args: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_tokens(args.into(), input).into()
}

/// Token-level expansion, shared with the unit tests.
pub fn expand_tokens(args: TokenStream2, input: DeriveInput) -> TokenStream2 {
    match RecordDef::parse(args, input) {
        Ok(record) => generate(&record),
        Err(err) => err.write_errors()
    }
}

fn generate(record: &RecordDef) -> TokenStream2 {
    let item = storage::generate(record);
    let accessors = accessors::generate(record);
    let registry = registry::generate(record);

    quote! {
        #item
        #accessors
        #registry
    }
}
