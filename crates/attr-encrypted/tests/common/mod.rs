// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared test encryptors.

#![allow(dead_code)]

use attr_encrypted::{Encryptor, EncryptorArgs, Error, Result};

/// XORs the value with the repeated key. Deterministic and its own inverse.
#[derive(Debug, Default, Clone, Copy)]
pub struct Xor;

impl Encryptor for Xor {
    fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        let key = args.key().ok_or(Error::MissingKey)?;
        Ok(xor(args.value, key.as_bytes()))
    }

    fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        self.encrypt(args)
    }
}

/// Fails the test if any operation is reached.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unreachable;

impl Encryptor for Unreachable {
    fn encrypt(&self, _args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        panic!("encryptor must not be called")
    }

    fn decrypt(&self, _args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        panic!("encryptor must not be called")
    }
}

pub fn xor(value: &[u8], key: &[u8]) -> Vec<u8> {
    value
        .iter()
        .zip(key.iter().cycle())
        .map(|(v, k)| v ^ k)
        .collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
