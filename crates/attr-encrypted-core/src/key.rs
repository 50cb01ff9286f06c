// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Encryption key material passed to encryptors.

use std::fmt;

use zeroize::Zeroizing;

/// Opaque key bytes handed to an [`Encryptor`](crate::Encryptor).
///
/// The buffer is wiped on drop and never printed by `Debug`.
///
/// # Example
///
/// ```rust
/// use attr_encrypted_core::Key;
///
/// let key = Key::from("a secret key that is 32 bytes!!!");
/// assert_eq!(key.len(), 32);
/// assert_eq!(format!("{key:?}"), "Key(<redacted, 32 bytes>)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Key(Zeroizing<Vec<u8>>);

impl Key {
    /// Create a key from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Borrow the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the key is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(<redacted, {} bytes>)", self.len())
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl<const N: usize> From<[u8; N]> for Key {
    fn from(value: [u8; N]) -> Self {
        Self::new(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Key {
    fn from(value: &[u8; N]) -> Self {
        Self::new(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_bytes() {
        let key = Key::from("hunter2");
        let debug = format!("{key:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("7 bytes"));
    }

    #[test]
    fn conversions_agree() {
        let a = Key::from("abc");
        let b = Key::from(b"abc");
        let c = Key::from(vec![b'a', b'b', b'c']);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_bytes(), b"abc");
    }

    #[test]
    fn empty_key() {
        assert!(Key::new(Vec::new()).is_empty());
    }
}
