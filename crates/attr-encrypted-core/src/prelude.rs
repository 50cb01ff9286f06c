// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use attr_encrypted::prelude::*;
//! ```

pub use crate::{
    AttributeValue, Dynamic, EffectiveOptions, EncryptedAttributes, Encode, Encoding, Encryptor,
    EncryptorArgs, Key, Marshaler, OptionSet, StoredValue
};
