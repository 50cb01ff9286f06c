// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-access option resolution.
//!
//! [`OptionSet::resolve`] turns a merged declaration into concrete
//! [`EffectiveOptions`] for one record. It is pure: the declaration is
//! borrowed immutably and every access gets a fresh value, so a key that
//! depends on the record never leaks into the next access.

use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::trace;

use crate::{
    encoding::Encode,
    encryptor::{Encryptor, default_encryptor},
    key::Key,
    marshal::Marshaler,
    options::{DEFAULT_DECRYPT_METHOD, DEFAULT_ENCRYPT_METHOD, OptionSet}
};

/// Fully concrete options for a single access.
///
/// Also the argument bundle handed to encryptors through
/// [`EncryptorArgs`](crate::EncryptorArgs).
#[derive(Clone)]
pub struct EffectiveOptions {
    /// Resolved key.
    pub key: Option<Key>,

    /// Resolved `if` condition.
    pub condition: bool,

    /// Resolved `unless` condition.
    pub unless: bool,

    /// Output encoding.
    pub encode: Encode,

    /// Serialize before encrypting.
    pub marshal: bool,

    /// Serializer used when `marshal` is on.
    pub marshaler: Marshaler,

    /// Encryptor for this access.
    pub encryptor: Arc<dyn Encryptor>,

    /// Operation called on write.
    pub encrypt_method: String,

    /// Operation called on read.
    pub decrypt_method: String,

    /// Encryptor-specific extras.
    pub extra: BTreeMap<String, String>
}

impl EffectiveOptions {
    /// Whether values should be transformed on this access.
    ///
    /// `true` iff `if` holds and `unless` does not. Otherwise the pipeline
    /// passes values through untouched.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.condition && !self.unless
    }
}

impl Default for EffectiveOptions {
    fn default() -> Self {
        Self {
            key:            None,
            condition:      true,
            unless:         false,
            encode:         Encode::Off,
            marshal:        false,
            marshaler:      Marshaler::default(),
            encryptor:      default_encryptor(),
            encrypt_method: DEFAULT_ENCRYPT_METHOD.to_string(),
            decrypt_method: DEFAULT_DECRYPT_METHOD.to_string(),
            extra:          BTreeMap::new()
        }
    }
}

impl fmt::Debug for EffectiveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveOptions")
            .field("key", &self.key)
            .field("condition", &self.condition)
            .field("unless", &self.unless)
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("marshaler", &self.marshaler)
            .field("encryptor", &self.encryptor.name())
            .field("encrypt_method", &self.encrypt_method)
            .field("decrypt_method", &self.decrypt_method)
            .field("extra", &self.extra)
            .finish()
    }
}

impl<T> OptionSet<T> {
    /// Evaluate this declaration against `instance`.
    ///
    /// Dynamic `key`, `if` and `unless` are called with the record; unset
    /// keys take the hardcoded defaults. `self` is never modified.
    ///
    /// Panics raised by user callbacks propagate unchanged.
    #[must_use]
    pub fn resolve(&self, instance: &T) -> EffectiveOptions {
        let defaults = EffectiveOptions::default();
        let resolved = EffectiveOptions {
            key:            self.key.as_ref().map(|key| key.resolve(instance)),
            condition:      self
                .condition
                .as_ref()
                .map_or(defaults.condition, |c| c.resolve(instance)),
            unless:         self
                .unless
                .as_ref()
                .map_or(defaults.unless, |u| u.resolve(instance)),
            encode:         self.encode.unwrap_or(defaults.encode),
            marshal:        self.marshal.unwrap_or(defaults.marshal),
            marshaler:      self.marshaler.unwrap_or(defaults.marshaler),
            encryptor:      self
                .encryptor
                .clone()
                .unwrap_or(defaults.encryptor),
            encrypt_method: self
                .encrypt_method
                .clone()
                .unwrap_or(defaults.encrypt_method),
            decrypt_method: self
                .decrypt_method
                .clone()
                .unwrap_or(defaults.decrypt_method),
            extra:          self.extra.clone()
        };
        trace!(
            has_key = resolved.key.is_some(),
            active = resolved.is_active(),
            encryptor = resolved.encryptor.name(),
            "resolved options"
        );
        resolved
    }
}
