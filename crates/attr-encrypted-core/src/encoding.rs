// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Binary-to-text encodings applied to encryptor output.
//!
//! Ciphertext is raw bytes; most storage columns want text. The `encode`
//! option selects one of these directives. `encode = true` means
//! [`Encoding::Base64`].
//!
//! | Directive | Aliases | Alphabet |
//! |-----------|---------|----------|
//! | `base64` | `m`, `m0` | standard, padded |
//! | `base64url` | `urlsafe` | URL-safe, padded |
//! | `hex` | `H*` | lowercase hex |

use std::{fmt, str::FromStr};

use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, URL_SAFE}
};

use crate::error::{Error, Result};

/// Textual encoding directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Standard base64 with padding.
    #[default]
    Base64,

    /// URL-safe base64 with padding.
    Base64Url,

    /// Lowercase hexadecimal.
    Hex
}

impl Encoding {
    /// Encode raw bytes into their textual form.
    #[must_use]
    pub fn encode(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Base64 => STANDARD.encode(bytes).into_bytes(),
            Self::Base64Url => URL_SAFE.encode(bytes).into_bytes(),
            Self::Hex => hex::encode(bytes).into_bytes()
        }
    }

    /// Decode text produced by [`Encoding::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base64`] or [`Error::Hex`] for malformed input.
    pub fn decode(&self, text: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => Ok(STANDARD.decode(text)?),
            Self::Base64Url => Ok(URL_SAFE.decode(text)?),
            Self::Hex => Ok(hex::decode(text)?)
        }
    }

    /// Canonical directive name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Base64Url => "base64url",
            Self::Hex => "hex"
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized encoding directive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown encoding directive `{0}`")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "m" | "m0" => Ok(Self::Base64),
            "H*" => Ok(Self::Hex),
            other => match other.to_lowercase().as_str() {
                "base64" => Ok(Self::Base64),
                "base64url" | "urlsafe" => Ok(Self::Base64Url),
                "hex" => Ok(Self::Hex),
                _ => Err(UnknownEncoding(value.to_string()))
            }
        }
    }
}

/// The `encode` option: either off or a directive.
///
/// Kept distinct from `Option<Encoding>` so an override can switch encoding
/// off explicitly even when the type-level defaults turn it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encode {
    /// Store encryptor output as-is.
    #[default]
    Off,

    /// Apply the given encoding.
    With(Encoding)
}

impl Encode {
    /// The active encoding, if any.
    pub const fn encoding(&self) -> Option<Encoding> {
        match self {
            Self::Off => None,
            Self::With(encoding) => Some(*encoding)
        }
    }
}

impl From<bool> for Encode {
    fn from(value: bool) -> Self {
        if value {
            Self::With(Encoding::default())
        } else {
            Self::Off
        }
    }
}

impl From<Encoding> for Encode {
    fn from(value: Encoding) -> Self {
        Self::With(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Vec<u8>> {
        vec![
            Vec::new(),
            vec![0x00],
            vec![0xff, 0xfe, 0x80, 0x7f],
            (0..=255).collect(),
            b"plain ascii".to_vec(),
        ]
    }

    #[test]
    fn every_encoding_round_trips_arbitrary_bytes() {
        for encoding in [Encoding::Base64, Encoding::Base64Url, Encoding::Hex] {
            for bytes in samples() {
                let text = encoding.encode(&bytes);
                assert_eq!(encoding.decode(&text).unwrap(), bytes, "{encoding}");
            }
        }
    }

    #[test]
    fn encoded_output_is_ascii() {
        let bytes: Vec<u8> = (0..=255).collect();
        for encoding in [Encoding::Base64, Encoding::Base64Url, Encoding::Hex] {
            assert!(encoding.encode(&bytes).is_ascii());
        }
    }

    #[test]
    fn malformed_text_fails_to_decode() {
        assert!(matches!(
            Encoding::Base64.decode(b"not*base64"),
            Err(Error::Base64(_))
        ));
        assert!(matches!(Encoding::Hex.decode(b"abc"), Err(Error::Hex(_))));
    }

    #[test]
    fn directives_parse() {
        assert_eq!("m".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!("m0".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!("BASE64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!("urlsafe".parse::<Encoding>().unwrap(), Encoding::Base64Url);
        assert_eq!("H*".parse::<Encoding>().unwrap(), Encoding::Hex);
        assert!("rot13".parse::<Encoding>().is_err());
    }

    #[test]
    fn true_normalizes_to_base64() {
        assert_eq!(Encode::from(true), Encode::With(Encoding::Base64));
        assert_eq!(Encode::from(false), Encode::Off);
        assert_eq!(Encode::Off.encoding(), None);
    }
}
