// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod attr_encrypted;

use proc_macro::TokenStream;

/// Declare encrypted attributes on a struct.
///
/// # Overview
///
/// Every field marked `#[encrypted]` becomes an encrypted attribute. The
/// field itself is the plaintext cache and must be `Option<V>`; the
/// ciphertext lives in a paired storage field that the macro adds unless
/// the struct already declares it.
///
/// Place `#[attr_encrypted]` above any `#[derive]` so derives see the
/// generated storage fields.
///
/// # Options
///
/// Arguments of `#[attr_encrypted(...)]` are type-level defaults;
/// arguments of `#[encrypted(...)]` override them per field.
///
/// | Option | Default | Description |
/// |--------|---------|-------------|
/// | `attribute` | none | Explicit storage field name |
/// | `prefix` | `"encrypted_"` | Storage name prefix |
/// | `suffix` | `""` | Storage name suffix |
/// | `key` | none | Key: literal, method name or closure |
/// | `encode` | off | Bare flag, `true`/`false`, or `"base64"`, `"base64url"`, `"hex"` |
/// | `marshal` | `false` | Serialize the value before encryption |
/// | `marshaler` | `"json"` | `"json"` or `"postcard"` |
/// | `encryptor` | AES-256-GCM | Expression producing an `Encryptor` |
/// | `encrypt_method` | `"encrypt"` | Encryptor operation used on write |
/// | `decrypt_method` | `"decrypt"` | Encryptor operation used on read |
/// | `if` | `true` | Transform only when true: literal, method name or closure |
/// | `unless` | `false` | Transform only when false: literal, method name or closure |
/// | anything else | | Literal passed to the encryptor as an extra |
///
/// Closures and encryptor expressions are evaluated inside a `static`, so
/// they must name the struct type instead of `Self`.
///
/// # Generated Items
///
/// For `email: Option<String>` stored in `encrypted_email`:
///
/// - `fn email(&mut self) -> Result<Option<&String>>`
/// - `fn set_email(&mut self, Option<String>) -> Result<()>`
/// - `fn encrypt_email(&self, Option<&String>) -> Result<Option<S>>`
/// - `fn decrypt_email(&self, Option<&S>) -> Result<Option<String>>`
/// - `fn encrypted_email(&self)` and `fn set_encrypted_email(&mut self, ..)`
///   when the storage field was generated
/// - `impl EncryptedAttributes for Record`
///
/// `encrypt_email` and `decrypt_email` take `&self` because `key`, `if` and
/// `unless` may be methods or closures resolved against the record on every
/// call. They never modify the record.
///
/// `S` is `String` when `encode` is on and a closed gate also stores text
/// (a `String` value, or `marshal` with the JSON marshaler); otherwise
/// `Vec<u8>`. Declare the storage field yourself to pick another
/// [`StoredValue`] type.
///
/// The storage field may not be an `#[encrypted]` field: an empty prefix and
/// suffix, or `attribute` naming an attribute, is rejected.
///
/// [`StoredValue`]: https://docs.rs/attr-encrypted-core/latest/attr_encrypted_core/trait.StoredValue.html
///
/// # Example
///
/// ```rust,ignore
/// use attr_encrypted::attr_encrypted;
///
/// #[attr_encrypted(encode, key = "0123456789abcdef0123456789abcdef")]
/// #[derive(Debug, Default)]
/// pub struct User {
///     pub id: u64,
///
///     #[encrypted]
///     pub email: Option<String>,
///
///     #[encrypted(key = tenant_key, if = is_active)]
///     pub ssn: Option<String>,
///
///     pub tenant: String,
///     pub active: bool
/// }
///
/// impl User {
///     fn tenant_key(&self) -> String {
///         format!("{:0>32}", self.tenant)
///     }
///
///     fn is_active(&self) -> bool {
///         self.active
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn attr_encrypted(args: TokenStream, input: TokenStream) -> TokenStream {
    attr_encrypted::expand(args, input)
}
