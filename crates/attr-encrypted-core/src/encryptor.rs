// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Encryptor contract.
//!
//! An encryptor owns everything cryptographic: cipher choice, key handling,
//! nonce management and integrity tagging. The pipeline only hands it the
//! effective options of the current access and the (possibly marshaled)
//! value, and stores whatever comes back.
//!
//! Operations are looked up by name through [`Encryptor::call`] so a
//! declaration can route to differently named operations with
//! `encrypt_method` / `decrypt_method`. Unknown names fail on first use.
//!
//! # Example
//!
//! ```rust
//! use attr_encrypted_core::{Encryptor, EncryptorArgs, Result};
//!
//! /// Reverses bytes. Deterministic, useful in tests.
//! struct Reverse;
//!
//! impl Encryptor for Reverse {
//!     fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
//!         Ok(args.value.iter().rev().copied().collect())
//!     }
//!
//!     fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
//!         Ok(args.value.iter().rev().copied().collect())
//!     }
//! }
//! ```

#[cfg(feature = "default-encryptor")]
mod aes;

use std::{
    any::type_name,
    sync::{Arc, LazyLock}
};

#[cfg(feature = "default-encryptor")]
pub use self::aes::{AUTH_DATA, Aes256GcmEncryptor};
use crate::{
    error::{Error, Result},
    key::Key,
    resolve::EffectiveOptions
};

/// Arguments passed to every encryptor operation.
///
/// Mirrors "the full effective option mapping plus a `value` entry".
#[derive(Debug, Clone, Copy)]
pub struct EncryptorArgs<'a> {
    /// Effective options of the current access.
    pub options: &'a EffectiveOptions,

    /// Bytes to transform.
    pub value: &'a [u8]
}

impl<'a> EncryptorArgs<'a> {
    /// Bundle options and value.
    pub const fn new(options: &'a EffectiveOptions, value: &'a [u8]) -> Self {
        Self {
            options,
            value
        }
    }

    /// Resolved key, if one was configured.
    #[must_use]
    pub fn key(&self) -> Option<&'a Key> {
        self.options.key.as_ref()
    }

    /// Encryptor-specific extra option passed through verbatim.
    #[must_use]
    pub fn extra(&self, name: &str) -> Option<&'a str> {
        self.options.extra.get(name).map(String::as_str)
    }
}

/// Pluggable encrypt/decrypt collaborator.
pub trait Encryptor: Send + Sync {
    /// Encrypt `args.value`.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>>;

    /// Decrypt `args.value`.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>>;

    /// Name used in error messages.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Dispatch an operation by name.
    ///
    /// The default knows `encrypt` and `decrypt`. Override to expose extra
    /// operations that declarations can select with `encrypt_method` or
    /// `decrypt_method`.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperation`] for unknown names, otherwise whatever
    /// the operation returns.
    fn call(&self, operation: &str, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        match operation {
            "encrypt" => self.encrypt(args),
            "decrypt" => self.decrypt(args),
            _ => Err(Error::UnsupportedOperation {
                encryptor: self.name(),
                operation: operation.to_string()
            })
        }
    }
}

impl<E: Encryptor + ?Sized> Encryptor for Arc<E> {
    fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        (**self).encrypt(args)
    }

    fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        (**self).decrypt(args)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn call(&self, operation: &str, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        (**self).call(operation, args)
    }
}

/// Placeholder used when no default encryptor is compiled in.
#[cfg(not(feature = "default-encryptor"))]
struct Unconfigured;

#[cfg(not(feature = "default-encryptor"))]
impl Encryptor for Unconfigured {
    fn encrypt(&self, _args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        Err(Error::NoEncryptor)
    }

    fn decrypt(&self, _args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        Err(Error::NoEncryptor)
    }

    fn call(&self, _operation: &str, _args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        Err(Error::NoEncryptor)
    }
}

static DEFAULT_ENCRYPTOR: LazyLock<Arc<dyn Encryptor>> = LazyLock::new(|| {
    #[cfg(feature = "default-encryptor")]
    let encryptor: Arc<dyn Encryptor> = Arc::new(Aes256GcmEncryptor);
    #[cfg(not(feature = "default-encryptor"))]
    let encryptor: Arc<dyn Encryptor> = Arc::new(Unconfigured);
    encryptor
});

/// Process-wide encryptor used by declarations that do not name one.
///
/// [`Aes256GcmEncryptor`] with the `default-encryptor` feature; otherwise
/// an encryptor that fails every call with [`Error::NoEncryptor`].
#[must_use]
pub fn default_encryptor() -> Arc<dyn Encryptor> {
    Arc::clone(&DEFAULT_ENCRYPTOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::EffectiveOptions;

    struct Upper;

    impl Encryptor for Upper {
        fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
            Ok(args.value.to_ascii_uppercase())
        }

        fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
            Ok(args.value.to_ascii_lowercase())
        }
    }

    #[test]
    fn call_dispatches_known_operations() {
        let options = EffectiveOptions::default();
        let args = EncryptorArgs::new(&options, b"abc");
        assert_eq!(Upper.call("encrypt", args).unwrap(), b"ABC");
        assert_eq!(Upper.call("decrypt", args).unwrap(), b"abc");
    }

    #[test]
    fn call_rejects_unknown_operation_lazily() {
        let options = EffectiveOptions::default();
        let err = Upper
            .call("seal", EncryptorArgs::new(&options, b"abc"))
            .unwrap_err();
        match err {
            Error::UnsupportedOperation {
                encryptor,
                operation
            } => {
                assert!(encryptor.ends_with("Upper"));
                assert_eq!(operation, "seal");
            }
            other => panic!("unexpected error: {other}")
        }
    }

    #[test]
    fn arc_forwards_to_inner() {
        let options = EffectiveOptions::default();
        let shared: Arc<dyn Encryptor> = Arc::new(Upper);
        assert!(shared.name().ends_with("Upper"));
        assert_eq!(
            shared
                .call("encrypt", EncryptorArgs::new(&options, b"x"))
                .unwrap(),
            b"X"
        );
    }

    #[test]
    fn args_expose_key_and_extras() {
        let mut options = EffectiveOptions::default();
        options.key = Some(Key::from("k"));
        options
            .extra
            .insert("auth_data".to_string(), "row-1".to_string());
        let args = EncryptorArgs::new(&options, b"");
        assert_eq!(args.key().unwrap().as_bytes(), b"k");
        assert_eq!(args.extra("auth_data"), Some("row-1"));
        assert_eq!(args.extra("missing"), None);
    }

    #[test]
    fn default_encryptor_is_shared() {
        assert!(Arc::ptr_eq(&default_encryptor(), &default_encryptor()));
    }
}
