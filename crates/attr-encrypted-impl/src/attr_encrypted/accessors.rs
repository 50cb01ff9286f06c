// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Accessor generation.
//!
//! For an attribute `email` stored in `encrypted_email: Option<S>`:
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | `email(&mut self)` | Decrypts into the cache on first read of a stored value |
//! | `set_email(&mut self, Option<V>)` | Encrypts into storage, then caches the plaintext |
//! | `encrypt_email(&self, Option<&V>)` | Write path only, no state change |
//! | `decrypt_email(&self, Option<&S>)` | Read path only, no state change |
//! | `encrypted_email(&self)` | Stored value; generated slots only |
//! | `set_encrypted_email(&mut self, Option<S>)` | Raw store; generated slots only |
//!
//! The cache is never invalidated: once populated, later writes to the
//! storage slot are not observed by the read accessor.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;

use super::parse::{EncryptedAttr, RecordDef, SlotOrigin};

/// Emit the inherent impl with every accessor.
pub fn generate(record: &RecordDef) -> TokenStream {
    let ident = record.ident();
    let methods = record.attrs.iter().map(attribute_methods);

    quote! {
        impl #ident {
            #(#methods)*
        }
    }
}

fn attribute_methods(attr: &EncryptedAttr) -> TokenStream {
    let vis = &attr.field.vis;
    let name = &attr.field.ident;
    let plain = name.unraw().to_string();
    let value_ty = &attr.field.value_ty;
    let slot = &attr.slot.ident;
    let stored_ty = &attr.slot.ty;

    let setter = format_ident!("set_{}", name.unraw());
    let encrypt = format_ident!("encrypt_{}", name.unraw());
    let decrypt = format_ident!("decrypt_{}", name.unraw());

    let read_doc = format!(
        "Decrypted `{plain}`.\n\nDecrypts `{slot}` on first access and caches the result. \
         The cache is not refreshed when `{slot}` changes later."
    );
    let write_doc =
        format!("Encrypt `value` into `{slot}` and cache it as the plaintext `{plain}`.");
    let encrypt_doc = format!(
        "Run the `{plain}` write path without modifying `self`.\n\n\
         Options are resolved against `self`, so per-record keys and conditions apply."
    );
    let decrypt_doc = format!(
        "Run the `{plain}` read path without modifying `self`.\n\n\
         Options are resolved against `self`, so per-record keys and conditions apply."
    );

    let storage_accessors = (attr.slot.origin == SlotOrigin::Generated).then(|| {
        let slot_setter = format_ident!("set_{}", slot.unraw());
        let get_doc = format!("Stored (encrypted) value of `{plain}`.");
        let set_doc = format!(
            "Replace the stored value of `{plain}`. The plaintext cache is left untouched."
        );
        quote! {
            #[doc = #get_doc]
            #[must_use]
            #vis fn #slot(&self) -> ::core::option::Option<&#stored_ty> {
                self.#slot.as_ref()
            }

            #[doc = #set_doc]
            #vis fn #slot_setter(&mut self, value: ::core::option::Option<#stored_ty>) {
                self.#slot = value;
            }
        }
    });

    quote! {
        #[doc = #read_doc]
        ///
        /// # Errors
        ///
        /// Propagates any decoding, decryption or unmarshaling failure.
        #vis fn #name(
            &mut self
        ) -> ::attr_encrypted::Result<::core::option::Option<&#value_ty>> {
            if self.#name.is_none() && self.#slot.is_some() {
                let value = self.#decrypt(self.#slot.as_ref())?;
                self.#name = value;
            }
            ::core::result::Result::Ok(self.#name.as_ref())
        }

        #[doc = #write_doc]
        ///
        /// # Errors
        ///
        /// Propagates any marshaling or encryption failure; `self` is left
        /// unchanged in that case.
        #vis fn #setter(
            &mut self,
            value: ::core::option::Option<#value_ty>
        ) -> ::attr_encrypted::Result<()> {
            self.#slot = self.#encrypt(value.as_ref())?;
            self.#name = value;
            ::core::result::Result::Ok(())
        }

        #[doc = #encrypt_doc]
        ///
        /// # Errors
        ///
        /// Propagates any marshaling or encryption failure.
        #vis fn #encrypt(
            &self,
            value: ::core::option::Option<&#value_ty>
        ) -> ::attr_encrypted::Result<::core::option::Option<#stored_ty>> {
            <Self as ::attr_encrypted::EncryptedAttributes>::encrypt_attribute(self, #plain, value)
        }

        #[doc = #decrypt_doc]
        ///
        /// # Errors
        ///
        /// Propagates any decoding, decryption or unmarshaling failure.
        #vis fn #decrypt(
            &self,
            stored: ::core::option::Option<&#stored_ty>
        ) -> ::attr_encrypted::Result<::core::option::Option<#value_ty>> {
            <Self as ::attr_encrypted::EncryptedAttributes>::decrypt_attribute(self, #plain, stored)
        }

        #storage_accessors
    }
}
