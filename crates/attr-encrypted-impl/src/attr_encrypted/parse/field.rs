// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Encrypted field parsing.
//!
//! A field becomes an encrypted attribute when it carries at least one
//! `#[encrypted]` or `#[encrypted(...)]` attribute. The field itself is the
//! plaintext cache and must be `Option<V>`.

use darling::Error;
use syn::{
    Attribute, Field, GenericArgument, Ident, Meta, PathArguments, Type, Visibility, ext::IdentExt
};

use super::options::{MarshalerArg, OptionsArgs};

/// Attribute name marking an encrypted field.
pub const ENCRYPTED: &str = "encrypted";

/// Where the storage slot of an attribute comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOrigin {
    /// Added to the struct by the macro.
    Generated,

    /// Already declared by the user.
    Manual
}

/// Encrypted-storage slot paired with an attribute.
#[derive(Debug, Clone)]
pub struct StorageSlot {
    /// Field name.
    pub ident: Ident,

    /// Stored type `S` of the `Option<S>` field.
    pub ty: Type,

    /// Who declares the field.
    pub origin: SlotOrigin
}

/// An `#[encrypted]` field.
#[derive(Debug, Clone)]
pub struct EncryptedField {
    /// Plain attribute name.
    pub ident: Ident,

    /// Visibility of the plaintext field, reused for generated items.
    pub vis: Visibility,

    /// Plaintext type `V` of the `Option<V>` field.
    pub value_ty: Type,

    /// Field-level overrides only.
    pub overrides: OptionsArgs,

    /// Type-level defaults merged with the overrides.
    pub effective: OptionsArgs
}

impl EncryptedField {
    /// Parse a field if it is marked `#[encrypted]`.
    ///
    /// Returns `Ok(None)` for ordinary fields. The marker attributes are
    /// removed from `field`.
    pub fn take(field: &mut Field, defaults: &OptionsArgs) -> darling::Result<Option<Self>> {
        let (markers, rest): (Vec<Attribute>, Vec<Attribute>) = field
            .attrs
            .drain(..)
            .partition(|attr| attr.path().is_ident(ENCRYPTED));
        field.attrs = rest;

        if markers.is_empty() {
            return Ok(None);
        }

        let mut errors = Error::accumulator();
        let mut overrides = OptionsArgs::default();
        for attr in &markers {
            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }
            let parsed = attr.parse_nested_meta(|meta| overrides.parse_meta(&meta, &mut errors));
            errors.handle(parsed.map_err(Error::from));
        }

        let ident = field.ident.clone().ok_or_else(|| {
            Error::custom("encrypted attributes must be named fields").with_span(&*field)
        });
        let ident = errors.handle(ident);

        let value_ty = option_inner(&field.ty).cloned().ok_or_else(|| {
            Error::custom("encrypted attributes must have type `Option<_>`; the field caches the plaintext")
                .with_span(&field.ty)
        });
        let value_ty = errors.handle(value_ty);

        errors.finish()?;
        let (Some(ident), Some(value_ty)) = (ident, value_ty) else {
            return Err(Error::custom("invalid encrypted field").with_span(&*field));
        };

        Ok(Some(Self {
            ident,
            vis: field.vis.clone(),
            value_ty,
            effective: defaults.merged(&overrides),
            overrides
        }))
    }

    /// Name of the storage slot, derived from the effective options.
    pub fn storage_name(&self) -> String {
        self.effective.storage_name(&self.ident.unraw().to_string())
    }

    /// Check if the effective options turn encoding on.
    pub fn is_encoded(&self) -> bool {
        self.effective.encode.is_some_and(|e| e.is_on())
    }

    /// Check if a closed `if`/`unless` gate stores valid UTF-8.
    ///
    /// The passthrough form is the JSON dump when marshaling and the raw
    /// form otherwise; only `String` has a raw form that is always text.
    pub fn passthrough_is_text(&self) -> bool {
        if self.effective.marshal.unwrap_or(false) {
            self.effective.marshaler.unwrap_or(MarshalerArg::Json) == MarshalerArg::Json
        } else {
            is_string(&self.value_ty)
        }
    }

    /// Default stored type for a generated slot.
    ///
    /// `String` only when encoded output and passthrough are both text.
    pub fn default_storage_ty(&self) -> Type {
        if self.is_encoded() && self.passthrough_is_text() {
            syn::parse_quote!(::std::string::String)
        } else {
            syn::parse_quote!(::std::vec::Vec<u8>)
        }
    }
}

fn is_string(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    type_path.qself.is_none()
        && type_path
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "String" && s.arguments.is_none())
}

/// Inner type of `Option<T>`, matching `Option`, `std::option::Option` and
/// `core::option::Option`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;
    use syn::{FieldsNamed, parse_quote};

    use super::{super::options::EncodeArg, *};

    fn first_field(fields: FieldsNamed) -> Field {
        fields.named.into_iter().next().unwrap()
    }

    #[test]
    fn plain_field_is_ignored() {
        let mut field = first_field(parse_quote!({ pub name: String }));
        assert!(
            EncryptedField::take(&mut field, &OptionsArgs::default())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn marker_is_stripped_and_options_merged() {
        let defaults = OptionsArgs {
            encode: Some(EncodeArg::Base64),
            ..OptionsArgs::default()
        };
        let mut field = first_field(parse_quote!({
            #[serde(default)]
            #[encrypted(suffix = "_ct")]
            pub email: Option<String>
        }));
        let parsed = EncryptedField::take(&mut field, &defaults)
            .unwrap()
            .unwrap();

        assert_eq!(field.attrs.len(), 1);
        assert!(field.attrs[0].path().is_ident("serde"));
        assert_eq!(parsed.ident, "email");
        assert_eq!(parsed.value_ty.to_token_stream().to_string(), "String");
        assert_eq!(parsed.storage_name(), "encrypted_email_ct");
        assert!(parsed.is_encoded());
        assert!(
            parsed
                .default_storage_ty()
                .to_token_stream()
                .to_string()
                .ends_with("String")
        );
    }

    #[test]
    fn bare_marker_uses_defaults() {
        let mut field = first_field(parse_quote!({ #[encrypted] ssn: Option<Vec<u8>> }));
        let parsed = EncryptedField::take(&mut field, &OptionsArgs::default())
            .unwrap()
            .unwrap();
        assert_eq!(parsed.storage_name(), "encrypted_ssn");
        assert!(!parsed.is_encoded());
    }

    #[test]
    fn binary_passthrough_gets_binary_slot() {
        let defaults = OptionsArgs {
            encode: Some(EncodeArg::Base64),
            ..OptionsArgs::default()
        };
        let postcard = OptionsArgs {
            marshal: Some(true),
            marshaler: Some(MarshalerArg::Postcard),
            ..defaults.clone()
        };
        let json = OptionsArgs {
            marshal: Some(true),
            ..defaults.clone()
        };

        let mut field = first_field(parse_quote!({ #[encrypted] hits: Option<u32> }));
        let parsed = EncryptedField::take(&mut field, &postcard)
            .unwrap()
            .unwrap();
        assert!(!parsed.passthrough_is_text());
        assert!(parsed.default_storage_ty().to_token_stream().to_string().contains("Vec"));

        let mut field = first_field(parse_quote!({ #[encrypted] hits: Option<u32> }));
        let parsed = EncryptedField::take(&mut field, &json).unwrap().unwrap();
        assert!(parsed.passthrough_is_text());

        let mut field = first_field(parse_quote!({ #[encrypted] blob: Option<Vec<u8>> }));
        let parsed = EncryptedField::take(&mut field, &defaults)
            .unwrap()
            .unwrap();
        assert!(parsed.is_encoded());
        assert!(parsed.default_storage_ty().to_token_stream().to_string().contains("Vec"));
    }

    #[test]
    fn non_option_field_is_rejected() {
        let mut field = first_field(parse_quote!({ #[encrypted] email: String }));
        let err = EncryptedField::take(&mut field, &OptionsArgs::default()).unwrap_err();
        assert!(err.to_string().contains("Option<_>"));
    }

    #[test]
    fn option_inner_accepts_qualified_paths() {
        let ty: Type = parse_quote!(::core::option::Option<u32>);
        assert!(option_inner(&ty).is_some());
        let ty: Type = parse_quote!(Result<u32, ()>);
        assert!(option_inner(&ty).is_none());
    }
}
