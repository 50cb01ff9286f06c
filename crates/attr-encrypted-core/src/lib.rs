// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime for attr-encrypted.
//!
//! This crate holds everything `#[attr_encrypted]` generated code calls at
//! runtime. It can also be used without the macro by building an
//! [`AttributeRegistry`] by hand.
//!
//! # Overview
//!
//! | Item | Role |
//! |------|------|
//! | [`OptionSet`], [`Dynamic`] | Declarative options, possibly per-record |
//! | [`EffectiveOptions`] | Options resolved for one access |
//! | [`AttributeRegistry`], [`AttributeSpec`] | Plain name to storage mapping |
//! | [`pipeline`] | Marshal, encrypt, encode and the reverse |
//! | [`Encryptor`] | Pluggable cryptography |
//! | [`Encoding`], [`Marshaler`] | Text and serialization formats |
//!
//! # Resolution order
//!
//! ```text
//! hardcoded defaults  <  #[attr_encrypted(...)]  <  #[encrypted(...)]
//! ```
//!
//! `key`, `if` and `unless` may name a method or be a closure; those are
//! evaluated against the record on every access and never stored back.
//!
//! # Feature flags
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `default-encryptor` | yes | [`Aes256GcmEncryptor`] as the process-wide default |
//! | `postcard` | yes | [`Marshaler::Postcard`] |
//!
//! # Example
//!
//! ```rust
//! use attr_encrypted_core::{AttributeRegistry, OptionSet, pipeline};
//!
//! struct User;
//!
//! let mut registry = AttributeRegistry::<User>::new();
//! registry.declare(&["email"], OptionSet::new().key("0123456789abcdef0123456789abcdef").encode(true));
//!
//! let options = registry.get("email").unwrap().resolve(&User);
//! let stored = pipeline::encrypt(Some(&"jane@example.com".to_string()), &options).unwrap();
//! let back: Option<String> = pipeline::decrypt(stored.as_deref(), &options).unwrap();
//! assert_eq!(back.as_deref(), Some("jane@example.com"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod encoding;
mod encryptor;
mod error;
mod key;
mod marshal;
mod options;
pub mod pipeline;
pub mod prelude;
mod registry;
mod resolve;
mod value;

#[cfg(feature = "default-encryptor")]
pub use encryptor::{AUTH_DATA, Aes256GcmEncryptor};
pub use encoding::{Encode, Encoding, UnknownEncoding};
pub use encryptor::{Encryptor, EncryptorArgs, default_encryptor};
pub use error::{Error, Result};
pub use key::Key;
pub use marshal::{Marshaler, UnknownMarshaler};
pub use options::{
    DEFAULT_DECRYPT_METHOD, DEFAULT_ENCRYPT_METHOD, DEFAULT_PREFIX, DEFAULT_SUFFIX, Dynamic,
    OptionSet
};
pub use registry::{AttributeRegistry, AttributeSpec, EncryptedAttributes, StorageOrigin};
pub use resolve::EffectiveOptions;
pub use value::{AttributeValue, StoredValue};

/// Route `trace!`/`debug!` output to the test harness; filtered by
/// `RUST_LOG`.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
