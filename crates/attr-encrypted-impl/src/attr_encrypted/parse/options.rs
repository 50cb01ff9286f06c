// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Option list parsing.
//!
//! The same grammar is used for the type-level `#[attr_encrypted(...)]`
//! arguments and for field-level `#[encrypted(...)]` overrides.
//!
//! | Key | Value |
//! |-----|-------|
//! | `attribute`, `prefix`, `suffix` | string literal |
//! | `key`, `if`, `unless` | literal, method path or closure |
//! | `encode` | bare flag, bool or directive string |
//! | `marshal` | bare flag or bool |
//! | `marshaler` | `"json"` or `"postcard"` |
//! | `encryptor` | any expression producing an `Encryptor` |
//! | `encrypt_method`, `decrypt_method` | string literal |
//! | anything else | literal, passed to the encryptor as an extra |

use darling::{Error, FromMeta, error::Accumulator};
use syn::{Expr, ExprClosure, Lit, LitStr, Path, Token, meta::ParseNestedMeta};

/// Value of `key`, `if` or `unless`.
#[derive(Debug, Clone)]
pub enum DynamicArg {
    /// Evaluated once when the registry is built.
    Literal(Expr),

    /// Method called with the record on every access.
    Method(Path),

    /// Closure called with the record on every access.
    Computed(ExprClosure)
}

impl FromMeta for DynamicArg {
    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        match expr {
            Expr::Path(path) if path.qself.is_none() => Ok(Self::Method(path.path.clone())),
            Expr::Closure(closure) => Ok(Self::Computed(closure.clone())),
            Expr::Group(group) => Self::from_expr(&group.expr),
            other => Ok(Self::Literal(other.clone()))
        }
    }
}

/// Value of `encode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeArg {
    Off,
    Base64,
    Base64Url,
    Hex
}

impl EncodeArg {
    /// Check if any encoding is applied.
    pub fn is_on(self) -> bool {
        self != Self::Off
    }
}

impl FromMeta for EncodeArg {
    fn from_word() -> darling::Result<Self> {
        Ok(Self::Base64)
    }

    fn from_bool(value: bool) -> darling::Result<Self> {
        Ok(if value { Self::Base64 } else { Self::Off })
    }

    fn from_string(value: &str) -> darling::Result<Self> {
        match value {
            "m" | "m0" => Ok(Self::Base64),
            "H*" => Ok(Self::Hex),
            other => match other.to_lowercase().as_str() {
                "base64" => Ok(Self::Base64),
                "base64url" | "urlsafe" => Ok(Self::Base64Url),
                "hex" => Ok(Self::Hex),
                _ => Err(Error::unknown_value(value))
            }
        }
    }
}

/// Value of `marshaler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarshalerArg {
    Json,
    Postcard
}

impl FromMeta for MarshalerArg {
    fn from_string(value: &str) -> darling::Result<Self> {
        match value.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "postcard" => Ok(Self::Postcard),
            _ => Err(Error::unknown_value(value))
        }
    }
}

/// One parsed option list.
#[derive(Debug, Clone, Default)]
pub struct OptionsArgs {
    pub attribute:      Option<LitStr>,
    pub prefix:         Option<LitStr>,
    pub suffix:         Option<LitStr>,
    pub key:            Option<DynamicArg>,
    pub encode:         Option<EncodeArg>,
    pub marshal:        Option<bool>,
    pub marshaler:      Option<MarshalerArg>,
    pub encryptor:      Option<Expr>,
    pub encrypt_method: Option<LitStr>,
    pub decrypt_method: Option<LitStr>,
    pub condition:      Option<DynamicArg>,
    pub unless:         Option<DynamicArg>,
    pub extra:          Vec<(String, String)>
}

impl OptionsArgs {
    /// Parse one `name = value` or bare `name` entry.
    ///
    /// Syntax errors abort the list; bad values are collected in `errors`
    /// so every problem is reported in one pass.
    pub fn parse_meta(
        &mut self,
        meta: &ParseNestedMeta<'_>,
        errors: &mut Accumulator
    ) -> syn::Result<()> {
        let Some(name) = meta.path.get_ident().map(ToString::to_string) else {
            return Err(meta.error("expected an option name"));
        };

        match name.as_str() {
            "attribute" => self.attribute = Some(meta.value()?.parse()?),
            "prefix" => self.prefix = Some(meta.value()?.parse()?),
            "suffix" => self.suffix = Some(meta.value()?.parse()?),
            "encrypt_method" => self.encrypt_method = Some(meta.value()?.parse()?),
            "decrypt_method" => self.decrypt_method = Some(meta.value()?.parse()?),
            "encryptor" => self.encryptor = Some(meta.value()?.parse()?),
            "key" => self.key = errors.handle(parse_value(meta)?),
            "if" => self.condition = errors.handle(parse_value(meta)?),
            "unless" => self.unless = errors.handle(parse_value(meta)?),
            "encode" => self.encode = errors.handle(parse_flag(meta)?),
            "marshal" => self.marshal = errors.handle(parse_flag(meta)?),
            "marshaler" => self.marshaler = errors.handle(parse_value(meta)?),
            _ => {
                let lit: Lit = meta.value()?.parse()?;
                if let Some(value) = errors.handle(extra_value(&lit)) {
                    self.extra.retain(|(existing, _)| existing != &name);
                    self.extra.push((name, value));
                }
            }
        }
        Ok(())
    }

    /// Overlay `overrides` on `self`; set keys in `overrides` win.
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut extra = self.extra.clone();
        for (name, value) in &overrides.extra {
            extra.retain(|(existing, _)| existing != name);
            extra.push((name.clone(), value.clone()));
        }

        Self {
            attribute: overrides
                .attribute
                .clone()
                .or_else(|| self.attribute.clone()),
            prefix: overrides.prefix.clone().or_else(|| self.prefix.clone()),
            suffix: overrides.suffix.clone().or_else(|| self.suffix.clone()),
            key: overrides.key.clone().or_else(|| self.key.clone()),
            encode: overrides.encode.or(self.encode),
            marshal: overrides.marshal.or(self.marshal),
            marshaler: overrides.marshaler.or(self.marshaler),
            encryptor: overrides
                .encryptor
                .clone()
                .or_else(|| self.encryptor.clone()),
            encrypt_method: overrides
                .encrypt_method
                .clone()
                .or_else(|| self.encrypt_method.clone()),
            decrypt_method: overrides
                .decrypt_method
                .clone()
                .or_else(|| self.decrypt_method.clone()),
            condition: overrides
                .condition
                .clone()
                .or_else(|| self.condition.clone()),
            unless: overrides.unless.clone().or_else(|| self.unless.clone()),
            extra
        }
    }

    /// Storage slot name for the attribute `plain`.
    pub fn storage_name(&self, plain: &str) -> String {
        if let Some(attribute) = &self.attribute {
            return attribute.value();
        }
        let prefix = self
            .prefix
            .as_ref()
            .map_or_else(|| "encrypted_".to_string(), LitStr::value);
        let suffix = self.suffix.as_ref().map(LitStr::value).unwrap_or_default();
        format!("{prefix}{plain}{suffix}")
    }
}

/// Parse `name = value` through [`FromMeta::from_expr`].
fn parse_value<T: FromMeta>(meta: &ParseNestedMeta<'_>) -> syn::Result<darling::Result<T>> {
    let expr: Expr = meta.value()?.parse()?;
    Ok(T::from_expr(&expr).map_err(|e| e.with_span(&expr)))
}

/// Parse a bare flag or `name = value`.
fn parse_flag<T: FromMeta>(meta: &ParseNestedMeta<'_>) -> syn::Result<darling::Result<T>> {
    if meta.input.peek(Token![=]) {
        parse_value(meta)
    } else {
        Ok(T::from_word().map_err(|e| e.with_span(&meta.path)))
    }
}

fn extra_value(lit: &Lit) -> darling::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Float(f) => Ok(f.base10_digits().to_string()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        Lit::Char(c) => Ok(c.value().to_string()),
        other => Err(Error::unexpected_lit_type(other))
    }
}
