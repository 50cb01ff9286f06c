// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record-level parsing: the annotated struct as a whole.
//!
//! Collects the type-level defaults, every `#[encrypted]` field and the
//! storage slot paired with each of them. A slot is [`SlotOrigin::Manual`]
//! when a field with the storage name already exists; its type must then be
//! `Option<_>` as well. A slot may never be an encrypted field, since that
//! field is the plaintext cache.

use std::collections::{BTreeMap, BTreeSet};

use darling::{Error, error::Accumulator};
use proc_macro2::TokenStream;
use syn::{Data, DeriveInput, Fields, Ident, ext::IdentExt, meta::parser, parse::Parser};

use super::{
    field::{EncryptedField, SlotOrigin, StorageSlot, option_inner},
    options::OptionsArgs
};

/// An encrypted field together with its storage slot.
#[derive(Debug, Clone)]
pub struct EncryptedAttr {
    /// The plaintext field.
    pub field: EncryptedField,

    /// The paired storage slot.
    pub slot: StorageSlot
}

/// Parsed `#[attr_encrypted]` struct.
#[derive(Debug)]
pub struct RecordDef {
    /// The struct with `#[encrypted]` markers removed.
    pub input: DeriveInput,

    /// Type-level defaults from the macro arguments.
    pub defaults: OptionsArgs,

    /// Encrypted attributes in declaration order.
    pub attrs: Vec<EncryptedAttr>
}

impl RecordDef {
    /// Parse macro arguments and the annotated item.
    ///
    /// # Errors
    ///
    /// All problems found are reported together: unsupported item shapes,
    /// malformed options, non-`Option` fields and storage name clashes.
    pub fn parse(args: TokenStream, mut input: DeriveInput) -> darling::Result<Self> {
        let mut errors = Error::accumulator();

        let mut defaults = OptionsArgs::default();
        let parsed = parser(|meta| defaults.parse_meta(&meta, &mut errors)).parse2(args);
        errors.handle(parsed.map_err(Error::from));

        if !input.generics.params.is_empty() {
            errors.push(
                Error::custom("#[attr_encrypted] does not support generic structs")
                    .with_span(&input.generics)
            );
        }

        let fields = match &mut input.data {
            Data::Struct(data) => match &mut data.fields {
                Fields::Named(named) => Some(named),
                other => {
                    errors.push(
                        Error::custom("#[attr_encrypted] requires a struct with named fields")
                            .with_span(&*other)
                    );
                    None
                }
            },
            _ => {
                errors.push(
                    Error::custom("#[attr_encrypted] can only be applied to structs")
                        .with_span(&input.ident)
                );
                None
            }
        };

        let mut encrypted = Vec::new();
        let mut existing = BTreeMap::new();
        if let Some(fields) = fields {
            for field in &mut fields.named {
                if let Some(parsed) = errors.handle(EncryptedField::take(field, &defaults)).flatten()
                {
                    encrypted.push(parsed);
                }
                if let Some(ident) = &field.ident {
                    existing.insert(ident.unraw().to_string(), field.ty.clone());
                }
            }
        }

        let attrs = resolve_slots(encrypted, &existing, &mut errors);
        errors.finish_with(Self {
            input,
            defaults,
            attrs
        })
    }

    /// Struct identifier.
    pub fn ident(&self) -> &Ident {
        &self.input.ident
    }

    /// Attributes whose slot the macro must add.
    pub fn generated(&self) -> impl Iterator<Item = &EncryptedAttr> {
        self.attrs
            .iter()
            .filter(|a| a.slot.origin == SlotOrigin::Generated)
    }
}

fn resolve_slots(
    fields: Vec<EncryptedField>,
    existing: &BTreeMap<String, syn::Type>,
    errors: &mut Accumulator
) -> Vec<EncryptedAttr> {
    let plain: BTreeSet<String> = fields
        .iter()
        .map(|f| f.ident.unraw().to_string())
        .collect();
    let mut generated: BTreeMap<String, Ident> = BTreeMap::new();
    let mut attrs = Vec::with_capacity(fields.len());

    for field in fields {
        let name = field.storage_name();
        if plain.contains(&name) {
            let message = if field.ident.unraw() == name {
                format!("storage field of `{name}` is the attribute itself; set a prefix, suffix or attribute")
            } else {
                format!("storage field `{name}` of `{}` is another encrypted attribute", field.ident)
            };
            errors.push(Error::custom(message).with_span(&field.ident));
            continue;
        }
        let ident = match syn::parse_str::<Ident>(&name) {
            Ok(mut parsed) => {
                parsed.set_span(field.ident.span());
                parsed
            }
            Err(_) => {
                errors.push(
                    Error::custom(format!("`{name}` is not a valid storage field name"))
                        .with_span(&field.ident)
                );
                continue;
            }
        };

        let slot = match existing.get(&name) {
            Some(ty) => match option_inner(ty) {
                Some(inner) => StorageSlot {
                    ident,
                    ty: inner.clone(),
                    origin: SlotOrigin::Manual
                },
                None => {
                    errors.push(
                        Error::custom(format!("storage field `{name}` must have type `Option<_>`"))
                            .with_span(ty)
                    );
                    continue;
                }
            },
            None => {
                if let Some(previous) = generated.get(&name) {
                    errors.push(
                        Error::custom(format!(
                            "`{}` and `{}` would share the storage field `{name}`",
                            previous, field.ident
                        ))
                        .with_span(&field.ident)
                    );
                    continue;
                }
                generated.insert(name, field.ident.clone());
                StorageSlot {
                    ty: field.default_storage_ty(),
                    ident,
                    origin: SlotOrigin::Generated
                }
            }
        };

        attrs.push(EncryptedAttr {
            field,
            slot
        });
    }
    attrs
}
