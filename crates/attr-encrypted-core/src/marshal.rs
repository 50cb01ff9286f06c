// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Serialization of structured values before encryption.

use std::{fmt, str::FromStr};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

/// Serializer used when `marshal` is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marshaler {
    /// JSON via `serde_json`.
    #[default]
    Json,

    /// Compact binary via `postcard`.
    #[cfg(feature = "postcard")]
    Postcard
}

impl Marshaler {
    /// Serialize a value to bytes.
    ///
    /// # Errors
    ///
    /// Propagates the underlying serializer error.
    pub fn dump<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>> {
        match self {
            Self::Json => Ok(serde_json::to_vec(value)?),
            #[cfg(feature = "postcard")]
            Self::Postcard => Ok(postcard::to_stdvec(value)?)
        }
    }

    /// Deserialize bytes produced by [`Marshaler::dump`].
    ///
    /// # Errors
    ///
    /// Propagates the underlying deserializer error.
    pub fn load<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            #[cfg(feature = "postcard")]
            Self::Postcard => Ok(postcard::from_bytes(bytes)?)
        }
    }

    /// Canonical marshaler name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            #[cfg(feature = "postcard")]
            Self::Postcard => "postcard"
        }
    }
}

impl fmt::Display for Marshaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized marshaler name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown marshaler `{0}`")]
pub struct UnknownMarshaler(pub String);

impl FromStr for Marshaler {
    type Err = UnknownMarshaler;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            #[cfg(feature = "postcard")]
            "postcard" => Ok(Self::Postcard),
            _ => Err(UnknownMarshaler(value.to_string()))
        }
    }
}
