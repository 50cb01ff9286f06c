// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-type attribute registry.
//!
//! The registry maps plain attribute names to their [`AttributeSpec`] and
//! tracks which encrypted-storage slots exist. `#[attr_encrypted]` builds one
//! per annotated struct, once, behind a `LazyLock`.
//!
//! # Invariants
//!
//! - One spec per plain name; a later [`declare`](AttributeRegistry::declare)
//!   of the same name replaces the earlier one.
//! - A storage slot is registered at most once. [`StorageOrigin::Manual`]
//!   slots are never downgraded to [`StorageOrigin::Generated`].
//!
//! Reopening a type is modelled by cloning its registry and declaring on the
//! clone; the original is unaffected.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::{Error, Result},
    options::OptionSet,
    pipeline,
    resolve::EffectiveOptions,
    value::{AttributeValue, StoredValue}
};

/// Who provides an encrypted-storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOrigin {
    /// Installed by the registrar.
    Generated,

    /// Declared by the user; never replaced.
    Manual
}

/// A declared encrypted attribute.
pub struct AttributeSpec<T> {
    name:           String,
    encrypted_name: String,
    options:        OptionSet<T>
}

impl<T> AttributeSpec<T> {
    /// Plain attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the paired storage slot.
    #[must_use]
    pub fn encrypted_name(&self) -> &str {
        &self.encrypted_name
    }

    /// Merged declaration-time options.
    #[must_use]
    pub const fn options(&self) -> &OptionSet<T> {
        &self.options
    }

    /// Effective options for `instance`.
    #[must_use]
    pub fn resolve(&self, instance: &T) -> EffectiveOptions {
        self.options.resolve(instance)
    }
}

impl<T> Clone for AttributeSpec<T> {
    fn clone(&self) -> Self {
        Self {
            name:           self.name.clone(),
            encrypted_name: self.encrypted_name.clone(),
            options:        self.options.clone()
        }
    }
}

impl<T> std::fmt::Debug for AttributeSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeSpec")
            .field("name", &self.name)
            .field("encrypted_name", &self.encrypted_name)
            .field("options", &self.options)
            .finish()
    }
}

/// Plain name to spec mapping for one record type.
///
/// # Example
///
/// ```rust
/// use attr_encrypted_core::{AttributeRegistry, OptionSet, StorageOrigin};
///
/// struct User;
///
/// let mut registry = AttributeRegistry::<User>::with_defaults(OptionSet::new().encode(true));
/// registry.define_storage("ssn_ciphertext");
/// registry
///     .declare(&["email"], OptionSet::new())
///     .declare(&["ssn"], OptionSet::new().attribute("ssn_ciphertext"));
///
/// assert_eq!(registry.encrypted_name("email"), Some("encrypted_email"));
/// assert_eq!(
///     registry.storage_origin("ssn_ciphertext"),
///     Some(StorageOrigin::Manual)
/// );
/// assert!(registry.is_encrypted("ssn"));
/// ```
pub struct AttributeRegistry<T> {
    defaults:   OptionSet<T>,
    attributes: Vec<AttributeSpec<T>>,
    storage:    BTreeMap<String, StorageOrigin>
}

impl<T> AttributeRegistry<T> {
    /// Registry without type-level defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(OptionSet::new())
    }

    /// Registry with type-level defaults applied to every declaration.
    #[must_use]
    pub fn with_defaults(defaults: OptionSet<T>) -> Self {
        Self {
            defaults,
            attributes: Vec::new(),
            storage: BTreeMap::new()
        }
    }

    /// Type-level defaults.
    #[must_use]
    pub const fn defaults(&self) -> &OptionSet<T> {
        &self.defaults
    }

    /// Declare encrypted attributes.
    ///
    /// Each name gets hardcoded defaults, then the type-level defaults, then
    /// `options`. Redeclaring a name replaces its spec. Storage slots are
    /// installed only when absent.
    pub fn declare(&mut self, names: &[&str], options: OptionSet<T>) -> &mut Self {
        let merged = OptionSet::defaults()
            .merge(&self.defaults)
            .merge(&options);

        for &name in names {
            let encrypted_name = merged.encrypted_name(name);
            self.storage
                .entry(encrypted_name.clone())
                .or_insert(StorageOrigin::Generated);

            let spec = AttributeSpec {
                name: name.to_string(),
                encrypted_name,
                options: merged.clone()
            };

            match self.attributes.iter_mut().find(|s| s.name == name) {
                Some(existing) => {
                    debug!(
                        attribute = name,
                        storage = spec.encrypted_name.as_str(),
                        "redeclared encrypted attribute"
                    );
                    *existing = spec;
                }
                None => {
                    debug!(
                        attribute = name,
                        storage = spec.encrypted_name.as_str(),
                        "declared encrypted attribute"
                    );
                    self.attributes.push(spec);
                }
            }
        }
        self
    }

    /// Register a user-provided storage slot.
    pub fn define_storage(&mut self, encrypted_name: impl Into<String>) -> &mut Self {
        self.storage
            .insert(encrypted_name.into(), StorageOrigin::Manual);
        self
    }

    /// Spec of a declared attribute.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownAttribute`] if `name` was never declared.
    pub fn get(&self, name: &str) -> Result<&AttributeSpec<T>> {
        self.attributes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))
    }

    /// Check if `name` is a declared attribute.
    #[must_use]
    pub fn is_encrypted(&self, name: &str) -> bool {
        self.attributes.iter().any(|s| s.name == name)
    }

    /// Storage slot name for a declared attribute.
    #[must_use]
    pub fn encrypted_name(&self, name: &str) -> Option<&str> {
        self.get(name).ok().map(AttributeSpec::encrypted_name)
    }

    /// Origin of a storage slot, if registered.
    #[must_use]
    pub fn storage_origin(&self, encrypted_name: &str) -> Option<StorageOrigin> {
        self.storage.get(encrypted_name).copied()
    }

    /// Declared attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec<T>> {
        self.attributes.iter()
    }

    /// Number of declared attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<T> Default for AttributeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for AttributeRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            defaults:   self.defaults.clone(),
            attributes: self.attributes.clone(),
            storage:    self.storage.clone()
        }
    }
}

impl<T> std::fmt::Debug for AttributeRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("defaults", &self.defaults)
            .field("attributes", &self.attributes)
            .field("storage", &self.storage)
            .finish()
    }
}

/// Record types with encrypted attributes.
///
/// Implemented by `#[attr_encrypted]`. The provided methods drive the
/// pipeline by attribute name; the generated typed accessors call them.
pub trait EncryptedAttributes: Sized + 'static {
    /// The type's registry.
    fn encrypted_attributes() -> &'static AttributeRegistry<Self>;

    /// Check if `name` is an encrypted attribute of this type.
    fn is_attr_encrypted(name: &str) -> bool {
        Self::encrypted_attributes().is_encrypted(name)
    }

    /// Effective options of `name` for this record.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownAttribute`] for undeclared names.
    fn attribute_options(&self, name: &str) -> Result<EffectiveOptions> {
        Ok(Self::encrypted_attributes().get(name)?.resolve(self))
    }

    /// Run the write path of `name` without touching the record.
    ///
    /// # Errors
    ///
    /// Unknown attribute, or any pipeline failure.
    fn encrypt_attribute<V, S>(&self, name: &str, value: Option<&V>) -> Result<Option<S>>
    where
        V: AttributeValue,
        S: StoredValue
    {
        let options = self.attribute_options(name)?;
        pipeline::encrypt(value, &options)?
            .map(S::from_stored_bytes)
            .transpose()
    }

    /// Run the read path of `name` without touching the record.
    ///
    /// # Errors
    ///
    /// Unknown attribute, or any pipeline failure.
    fn decrypt_attribute<V, S>(&self, name: &str, stored: Option<&S>) -> Result<Option<V>>
    where
        V: AttributeValue,
        S: StoredValue
    {
        let options = self.attribute_options(name)?;
        pipeline::decrypt(stored.map(S::as_stored_bytes), &options)
    }
}
