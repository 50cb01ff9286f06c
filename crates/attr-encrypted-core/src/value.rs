// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Plaintext and storage representations.
//!
//! The pipeline itself works on bytes. [`AttributeValue`] converts the
//! plaintext type of an attribute into bytes (either its raw form or via a
//! [`Marshaler`](crate::Marshaler)); [`StoredValue`] converts pipeline output
//! into the type of the storage slot.
//!
//! Only byte-like types have a raw form. Everything else must be declared
//! with `marshal`:
//!
//! ```rust,ignore
//! #[derive(Serialize, Deserialize)]
//! struct Address { street: String }
//!
//! impl AttributeValue for Address {}
//! ```

use std::{any::type_name, collections::BTreeMap};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// A plaintext value that can be encrypted into a storage slot.
///
/// The default methods report that no raw form exists, which makes the
/// pipeline require `marshal` for the type.
pub trait AttributeValue: Serialize + DeserializeOwned {
    /// Raw byte form used when `marshal` is off.
    fn to_raw(&self) -> Option<Vec<u8>> {
        None
    }

    /// Rebuild the value from its raw byte form.
    ///
    /// Returns `None` when the type has no raw form.
    fn from_raw(bytes: Vec<u8>) -> Option<Result<Self>> {
        let _ = bytes;
        None
    }

    /// Raw form, or [`Error::RawFormUnavailable`].
    ///
    /// # Errors
    ///
    /// Fails for types without a raw form.
    fn require_raw(&self) -> Result<Vec<u8>> {
        self.to_raw().ok_or(Error::RawFormUnavailable {
            type_name: type_name::<Self>()
        })
    }

    /// Rebuild from raw bytes, or [`Error::RawFormUnavailable`].
    ///
    /// # Errors
    ///
    /// Fails for types without a raw form or when the bytes are invalid for
    /// the type.
    fn require_from_raw(bytes: Vec<u8>) -> Result<Self> {
        Self::from_raw(bytes).unwrap_or(Err(Error::RawFormUnavailable {
            type_name: type_name::<Self>()
        }))
    }
}

impl AttributeValue for String {
    fn to_raw(&self) -> Option<Vec<u8>> {
        Some(self.as_bytes().to_vec())
    }

    fn from_raw(bytes: Vec<u8>) -> Option<Result<Self>> {
        Some(String::from_utf8(bytes).map_err(Error::from))
    }
}

impl AttributeValue for Vec<u8> {
    fn to_raw(&self) -> Option<Vec<u8>> {
        Some(self.clone())
    }

    fn from_raw(bytes: Vec<u8>) -> Option<Result<Self>> {
        Some(Ok(bytes))
    }
}

macro_rules! marshal_only {
    ($($ty:ty),* $(,)?) => {
        $(impl AttributeValue for $ty {})*
    };
}

marshal_only!(
    bool, char, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64, isize, usize
);

impl<V: Serialize + DeserializeOwned> AttributeValue for Option<V> {}
impl AttributeValue for Vec<String> {}
impl<K, V> AttributeValue for BTreeMap<K, V>
where
    K: Serialize + DeserializeOwned + Ord,
    V: Serialize + DeserializeOwned
{
}

/// Representation of an encrypted-storage slot.
pub trait StoredValue: Sized {
    /// Borrow the stored bytes.
    fn as_stored_bytes(&self) -> &[u8];

    /// Build a stored value from pipeline output.
    ///
    /// # Errors
    ///
    /// Fails when the bytes cannot be represented by the slot type.
    fn from_stored_bytes(bytes: Vec<u8>) -> Result<Self>;
}

/// Text column.
///
/// Holds encoded ciphertext, or the plaintext itself when the `if`/`unless`
/// gate passes values through. Unencoded ciphertext is rarely valid UTF-8 and
/// fails with [`Error::Utf8`].
impl StoredValue for String {
    fn as_stored_bytes(&self) -> &[u8] {
        self.as_bytes()
    }

    fn from_stored_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(String::from_utf8(bytes)?)
    }
}

/// Binary column.
impl StoredValue for Vec<u8> {
    fn as_stored_bytes(&self) -> &[u8] {
        self
    }

    fn from_stored_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_has_raw_form() {
        let raw = "hello".to_string().require_raw().unwrap();
        assert_eq!(raw, b"hello");
        assert_eq!(String::require_from_raw(raw).unwrap(), "hello");
    }

    #[test]
    fn string_from_invalid_utf8_fails() {
        assert!(matches!(
            String::require_from_raw(vec![0xff, 0xfe]),
            Err(Error::Utf8(_))
        ));
    }

    #[test]
    fn bytes_have_raw_form() {
        let bytes = vec![0u8, 0xff, 0x80];
        assert_eq!(bytes.require_raw().unwrap(), bytes);
        assert_eq!(Vec::<u8>::require_from_raw(bytes.clone()).unwrap(), bytes);
    }

    #[test]
    fn numbers_need_marshal() {
        assert!(matches!(
            42_u32.require_raw(),
            Err(Error::RawFormUnavailable {
                type_name: "u32"
            })
        ));
        assert!(u32::require_from_raw(vec![1]).is_err());
    }

    #[test]
    fn stored_string_rejects_binary() {
        assert!(String::from_stored_bytes(vec![0xc3, 0x28]).is_err());
        assert_eq!(
            String::from_stored_bytes(b"abc".to_vec()).unwrap().as_stored_bytes(),
            b"abc"
        );
    }
}
