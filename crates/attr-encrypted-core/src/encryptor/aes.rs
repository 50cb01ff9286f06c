// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! AES-256-GCM default encryptor.
//!
//! Layout of the produced bytes:
//!
//! ```text
//! [ 12-byte random nonce | ciphertext | 16-byte tag ]
//! ```
//!
//! The key must be exactly 32 bytes. The optional `auth_data` extra is bound
//! as additional authenticated data and must match on decrypt.

use aes_gcm::{
    Aes256Gcm, KeyInit, Nonce,
    aead::{Aead as _, Payload}
};

use super::{Encryptor, EncryptorArgs};
use crate::error::{Error, Result};

const KEY_SIZE: usize = 32;
const NONCE_SIZE: usize = 12;

/// Extra option carrying additional authenticated data.
pub const AUTH_DATA: &str = "auth_data";

/// AES-256-GCM with a random nonce per encryption.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmEncryptor;

impl Aes256GcmEncryptor {
    fn cipher(args: &EncryptorArgs<'_>) -> Result<Aes256Gcm> {
        let key = args.key().ok_or(Error::MissingKey)?;
        if key.len() != KEY_SIZE {
            return Err(Error::InvalidKeyLength {
                expected: KEY_SIZE,
                actual:   key.len()
            });
        }
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| Error::Cipher)
    }
}

impl Encryptor for Aes256GcmEncryptor {
    fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        let cipher = Self::cipher(&args)?;
        let nonce_bytes: [u8; NONCE_SIZE] = rand::random();
        let aad = args.extra(AUTH_DATA).unwrap_or_default().as_bytes();
        let payload = Payload {
            msg: args.value,
            aad
        };

        let mut encrypted = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), payload)
            .map_err(|_| Error::Cipher)?;
        let mut message = Vec::with_capacity(NONCE_SIZE + encrypted.len());
        message.extend_from_slice(&nonce_bytes);
        message.append(&mut encrypted);
        Ok(message)
    }

    fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        let cipher = Self::cipher(&args)?;
        let (nonce, msg) = args
            .value
            .split_at_checked(NONCE_SIZE)
            .ok_or(Error::Cipher)?;
        let aad = args.extra(AUTH_DATA).unwrap_or_default().as_bytes();

        cipher
            .decrypt(Nonce::from_slice(nonce), Payload {
                msg,
                aad
            })
            .map_err(|_| Error::Cipher)
    }

    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }
}
