// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declaration-time option sets.
//!
//! An [`OptionSet`] is what a declaration says: every key is optional so
//! that sets can be layered. Three layers are merged per attribute, later
//! layers winning key by key:
//!
//! ```text
//! OptionSet::defaults()        hardcoded defaults
//!   .merge(type defaults)      #[attr_encrypted(...)] arguments
//!   .merge(field overrides)    #[encrypted(...)] arguments
//! ```
//!
//! `key`, `if` and `unless` are [`Dynamic`]: they may be literals, instance
//! methods or closures, and are evaluated per access by
//! [`OptionSet::resolve`](crate::OptionSet::resolve). Everything else is
//! static.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    encoding::Encode,
    encryptor::{Encryptor, default_encryptor},
    key::Key,
    marshal::Marshaler
};

/// Default prefix of the encrypted-storage attribute name.
pub const DEFAULT_PREFIX: &str = "encrypted_";

/// Default suffix of the encrypted-storage attribute name.
pub const DEFAULT_SUFFIX: &str = "";

/// Default encryptor operation for the write path.
pub const DEFAULT_ENCRYPT_METHOD: &str = "encrypt";

/// Default encryptor operation for the read path.
pub const DEFAULT_DECRYPT_METHOD: &str = "decrypt";

/// Option value evaluated against the record on every access.
///
/// # Example
///
/// ```rust
/// use attr_encrypted_core::{Dynamic, Key};
///
/// struct User {
///     tenant_key: String
/// }
///
/// impl User {
///     fn key(&self) -> Key {
///         Key::from(&self.tenant_key)
///     }
/// }
///
/// let literal: Dynamic<User, bool> = Dynamic::Literal(true);
/// let method: Dynamic<User, Key> = Dynamic::method("key", User::key);
/// let computed: Dynamic<User, bool> = Dynamic::computed(|u: &User| !u.tenant_key.is_empty());
///
/// let user = User {
///     tenant_key: "t".into()
/// };
/// assert!(literal.resolve(&user));
/// assert_eq!(method.resolve(&user).as_bytes(), b"t");
/// assert!(computed.resolve(&user));
/// ```
pub enum Dynamic<T, V> {
    /// Used as-is.
    Literal(V),

    /// Instance method called with the record.
    Method {
        /// Method name, kept for diagnostics.
        name: &'static str,
        /// The method itself.
        call: fn(&T) -> V
    },

    /// Closure called with the record.
    Computed(Arc<dyn Fn(&T) -> V + Send + Sync>)
}

impl<T, V> Dynamic<T, V> {
    /// Wrap an instance method.
    pub const fn method(name: &'static str, call: fn(&T) -> V) -> Self {
        Self::Method {
            name,
            call
        }
    }

    /// Wrap a closure.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static
    {
        Self::Computed(Arc::new(f))
    }

    /// Wrap a closure whose result converts into `V`.
    ///
    /// Used by generated code so that `key = |u| u.secret.clone()` can return
    /// anything `Into<Key>`.
    pub fn computed_into<F, R>(f: F) -> Self
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: Into<V>
    {
        Self::Computed(Arc::new(move |instance| f(instance).into()))
    }

    /// Check if the value depends on the record.
    pub const fn is_dynamic(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }
}

impl<T, V: Clone> Dynamic<T, V> {
    /// Evaluate against a record.
    ///
    /// Literals are cloned; methods and closures are called with `instance`.
    /// Panics inside user code propagate unchanged.
    pub fn resolve(&self, instance: &T) -> V {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Method {
                call, ..
            } => call(instance),
            Self::Computed(f) => f(instance)
        }
    }
}

impl<T, V> From<V> for Dynamic<T, V> {
    fn from(value: V) -> Self {
        Self::Literal(value)
    }
}

impl<T, V: Clone> Clone for Dynamic<T, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Method {
                name,
                call
            } => Self::Method {
                name: *name,
                call: *call
            },
            Self::Computed(f) => Self::Computed(Arc::clone(f))
        }
    }
}

impl<T, V: fmt::Debug> fmt::Debug for Dynamic<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Method {
                name, ..
            } => f.debug_struct("Method").field("name", name).finish(),
            Self::Computed(_) => f.write_str("Computed(<closure>)")
        }
    }
}

/// Declarative options of one layer.
///
/// `None` means "not specified here"; [`OptionSet::merge`] fills it from
/// the layer below.
pub struct OptionSet<T> {
    /// Explicit encrypted-storage attribute name.
    pub attribute: Option<String>,

    /// Prefix used to derive the storage name.
    pub prefix: Option<String>,

    /// Suffix used to derive the storage name.
    pub suffix: Option<String>,

    /// Encryption key.
    pub key: Option<Dynamic<T, Key>>,

    /// Textual encoding of the encryptor output.
    pub encode: Option<Encode>,

    /// Serialize the value before encryption.
    pub marshal: Option<bool>,

    /// Serializer used when `marshal` is on.
    pub marshaler: Option<Marshaler>,

    /// Encryptor used for this attribute.
    pub encryptor: Option<Arc<dyn Encryptor>>,

    /// Encryptor operation called on write.
    pub encrypt_method: Option<String>,

    /// Encryptor operation called on read.
    pub decrypt_method: Option<String>,

    /// The `if` option: transform only when it evaluates to `true`.
    pub condition: Option<Dynamic<T, bool>>,

    /// The `unless` option: transform only when it evaluates to `false`.
    pub unless: Option<Dynamic<T, bool>>,

    /// Encryptor-specific extras, passed through verbatim.
    pub extra: BTreeMap<String, String>
}

impl<T> OptionSet<T> {
    /// Empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attribute:      None,
            prefix:         None,
            suffix:         None,
            key:            None,
            encode:         None,
            marshal:        None,
            marshaler:      None,
            encryptor:      None,
            encrypt_method: None,
            decrypt_method: None,
            condition:      None,
            unless:         None,
            extra:          BTreeMap::new()
        }
    }

    /// Hardcoded defaults: the bottom layer.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            attribute:      None,
            prefix:         Some(DEFAULT_PREFIX.to_string()),
            suffix:         Some(DEFAULT_SUFFIX.to_string()),
            key:            None,
            encode:         Some(Encode::Off),
            marshal:        Some(false),
            marshaler:      Some(Marshaler::default()),
            encryptor:      Some(default_encryptor()),
            encrypt_method: Some(DEFAULT_ENCRYPT_METHOD.to_string()),
            decrypt_method: Some(DEFAULT_DECRYPT_METHOD.to_string()),
            condition:      Some(Dynamic::Literal(true)),
            unless:         Some(Dynamic::Literal(false)),
            extra:          BTreeMap::new()
        }
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Keys set in `overrides` win; extras are unioned with `overrides`
    /// winning on conflicts. Neither input is modified.
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        let mut extra = self.extra.clone();
        extra.extend(
            overrides
                .extra
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
        );

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

    /// Name of the storage attribute for `plain_name`.
    ///
    /// `attribute` wins outright; otherwise `prefix + plain_name + suffix`,
    /// with the hardcoded defaults for unset parts.
    #[must_use]
    pub fn encrypted_name(&self, plain_name: &str) -> String {
        if let Some(attribute) = &self.attribute {
            return attribute.clone();
        }
        let prefix = self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX);
        let suffix = self.suffix.as_deref().unwrap_or(DEFAULT_SUFFIX);
        format!("{prefix}{plain_name}{suffix}")
    }

    /// Set an explicit storage attribute name.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    /// Set the storage name prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the storage name suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set a literal key.
    #[must_use]
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(Dynamic::Literal(key.into()));
        self
    }

    /// Set a key computed per record.
    #[must_use]
    pub fn dynamic_key(mut self, key: Dynamic<T, Key>) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the output encoding (`true` selects base64).
    #[must_use]
    pub fn encode(mut self, encode: impl Into<Encode>) -> Self {
        self.encode = Some(encode.into());
        self
    }

    /// Enable or disable marshaling.
    #[must_use]
    pub fn marshal(mut self, marshal: bool) -> Self {
        self.marshal = Some(marshal);
        self
    }

    /// Select the marshaler.
    #[must_use]
    pub fn marshaler(mut self, marshaler: Marshaler) -> Self {
        self.marshaler = Some(marshaler);
        self
    }

    /// Select the encryptor.
    #[must_use]
    pub fn encryptor<E: Encryptor + 'static>(mut self, encryptor: E) -> Self {
        self.encryptor = Some(Arc::new(encryptor));
        self
    }

    /// Select the encryptor operation used on write.
    #[must_use]
    pub fn encrypt_method(mut self, name: impl Into<String>) -> Self {
        self.encrypt_method = Some(name.into());
        self
    }

    /// Select the encryptor operation used on read.
    #[must_use]
    pub fn decrypt_method(mut self, name: impl Into<String>) -> Self {
        self.decrypt_method = Some(name.into());
        self
    }

    /// Set the `if` condition.
    #[must_use]
    pub fn condition(mut self, condition: impl Into<Dynamic<T, bool>>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Set the `unless` condition.
    #[must_use]
    pub fn unless(mut self, unless: impl Into<Dynamic<T, bool>>) -> Self {
        self.unless = Some(unless.into());
        self
    }

    /// Add an encryptor-specific extra.
    #[must_use]
    pub fn extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

impl<T> Default for OptionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for OptionSet<T> {
    fn clone(&self) -> Self {
        Self::new().merge(self)
    }
}

impl<T> fmt::Debug for OptionSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSet")
            .field("attribute", &self.attribute)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("key", &self.key)
            .field("encode", &self.encode)
            .field("marshal", &self.marshal)
            .field("marshaler", &self.marshaler)
            .field("encryptor", &self.encryptor.as_ref().map(|e| e.name()))
            .field("encrypt_method", &self.encrypt_method)
            .field("decrypt_method", &self.decrypt_method)
            .field("condition", &self.condition)
            .field("unless", &self.unless)
            .field("extra", &self.extra)
            .finish()
    }
}
