// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transform pipeline.
//!
//! ```text
//! write:  value ─▶ marshal? ─▶ encryptor.call(encrypt_method) ─▶ encode? ─▶ stored
//! read:   stored ─▶ decode? ─▶ encryptor.call(decrypt_method) ─▶ unmarshal? ─▶ value
//! ```
//!
//! Both directions are gated by [`EffectiveOptions::is_active`]. When the
//! gate is closed the value passes through in its untransformed byte form:
//! the raw form for byte-like types, the marshaled form otherwise. `None`
//! always maps to `None` and the encryptor is never called for it.

use tracing::{debug, trace};

use crate::{
    encryptor::{Encryptor, EncryptorArgs},
    error::Result,
    resolve::EffectiveOptions,
    value::AttributeValue
};

/// Write path: plaintext to stored bytes.
///
/// # Errors
///
/// Marshaling, encryptor or raw-form failures.
///
/// # Example
///
/// ```rust
/// use attr_encrypted_core::{EffectiveOptions, Encode, pipeline};
///
/// let options = EffectiveOptions {
///     condition: false,
///     encode: Encode::from(true),
///     ..EffectiveOptions::default()
/// };
/// let stored = pipeline::encrypt(Some(&"plain".to_string()), &options).unwrap();
/// assert_eq!(stored.as_deref(), Some(&b"plain"[..]));
/// ```
pub fn encrypt<V: AttributeValue>(
    value: Option<&V>,
    options: &EffectiveOptions
) -> Result<Option<Vec<u8>>> {
    let Some(value) = value else {
        return Ok(None);
    };

    if !options.is_active() {
        debug!(
            condition = options.condition,
            unless = options.unless,
            "gate closed, storing value untransformed"
        );
        return passthrough_out(value, options).map(Some);
    }

    let plain = if options.marshal {
        options.marshaler.dump(value)?
    } else {
        value.require_raw()?
    };

    let ciphertext = options
        .encryptor
        .call(&options.encrypt_method, EncryptorArgs::new(options, &plain))?;

    let stored = match options.encode.encoding() {
        Some(encoding) => encoding.encode(&ciphertext),
        None => ciphertext
    };

    trace!(
        encryptor = options.encryptor.name(),
        operation = options.encrypt_method.as_str(),
        encode = ?options.encode,
        marshal = options.marshal,
        stored_len = stored.len(),
        "encrypted attribute value"
    );
    Ok(Some(stored))
}

/// Read path: stored bytes to plaintext.
///
/// # Errors
///
/// Decoding, encryptor, unmarshaling or raw-form failures.
pub fn decrypt<V: AttributeValue>(
    stored: Option<&[u8]>,
    options: &EffectiveOptions
) -> Result<Option<V>> {
    let Some(stored) = stored else {
        return Ok(None);
    };

    if !options.is_active() {
        debug!(
            condition = options.condition,
            unless = options.unless,
            "gate closed, reading stored value untransformed"
        );
        return passthrough_in(stored, options).map(Some);
    }

    let decoded;
    let ciphertext = match options.encode.encoding() {
        Some(encoding) => {
            decoded = encoding.decode(stored)?;
            decoded.as_slice()
        }
        None => stored
    };

    let plain = options
        .encryptor
        .call(&options.decrypt_method, EncryptorArgs::new(options, ciphertext))?;

    trace!(
        encryptor = options.encryptor.name(),
        operation = options.decrypt_method.as_str(),
        encode = ?options.encode,
        marshal = options.marshal,
        "decrypted attribute value"
    );

    let value = if options.marshal {
        options.marshaler.load(&plain)?
    } else {
        V::require_from_raw(plain)?
    };
    Ok(Some(value))
}

fn passthrough_out<V: AttributeValue>(value: &V, options: &EffectiveOptions) -> Result<Vec<u8>> {
    match value.to_raw() {
        Some(raw) if !options.marshal => Ok(raw),
        _ => options.marshaler.dump(value)
    }
}

fn passthrough_in<V: AttributeValue>(stored: &[u8], options: &EffectiveOptions) -> Result<V> {
    if !options.marshal
        && let Some(value) = V::from_raw(stored.to_vec())
    {
        return value;
    }
    options.marshaler.load(stored)
}
