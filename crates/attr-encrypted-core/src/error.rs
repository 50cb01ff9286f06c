// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error type for attribute encryption.
//!
//! Failures are never recovered locally: every variant is returned to the
//! caller of the accessor that triggered it. Validation is lazy, so a
//! misconfigured declaration (unknown encryptor operation, missing key)
//! surfaces on first access rather than at declaration time.

use std::string::FromUtf8Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while encrypting or decrypting an attribute.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The encryptor does not expose an operation with this name.
    ///
    /// Raised by [`Encryptor::call`](crate::Encryptor::call) when
    /// `encrypt_method` or `decrypt_method` names something it does not know.
    #[error("encryptor `{encryptor}` does not support operation `{operation}`")]
    UnsupportedOperation {
        /// Encryptor type name.
        encryptor: &'static str,
        /// Requested operation name.
        operation: String
    },

    /// No `key` option was configured for an encryptor that needs one.
    #[error("no encryption key configured")]
    MissingKey,

    /// The key does not have the length required by the cipher.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required length in bytes.
        expected: usize,
        /// Length of the configured key.
        actual:   usize
    },

    /// The cipher rejected the input (wrong key, tampered or truncated data).
    #[error("cipher operation failed")]
    Cipher,

    /// Stored text is not valid base64.
    #[error("invalid base64 in stored value: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Stored text is not valid hex.
    #[error("invalid hex in stored value: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Bytes could not be represented as a UTF-8 string.
    #[error("value is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// JSON marshaling failed.
    #[error("json marshaling failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Postcard marshaling failed.
    #[cfg(feature = "postcard")]
    #[error("postcard marshaling failed: {0}")]
    Postcard(#[from] postcard::Error),

    /// The value type has no raw byte form and `marshal` is not enabled.
    #[error("`{type_name}` has no raw byte form; enable `marshal` for this attribute")]
    RawFormUnavailable {
        /// Rust type name of the value.
        type_name: &'static str
    },

    /// No attribute with this plain name was declared.
    #[error("attribute `{0}` is not encrypted")]
    UnknownAttribute(String),

    /// No default encryptor is compiled in and the declaration named none.
    #[error("no encryptor configured and the `default-encryptor` feature is disabled")]
    NoEncryptor,

    /// Failure reported by a third-party encryptor.
    #[error(transparent)]
    Encryptor(Box<dyn std::error::Error + Send + Sync>)
}

impl Error {
    /// Wrap an error raised by a custom [`Encryptor`](crate::Encryptor).
    pub fn encryptor<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static
    {
        Self::Encryptor(Box::new(err))
    }

    /// Check if this error comes from decoding stored text.
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Base64(_) | Self::Hex(_))
    }
}
