// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Minimal declaration with the default encryptor.

use attr_encrypted::{EncryptedAttributes, attr_encrypted};

#[attr_encrypted(key = "0123456789abcdef0123456789abcdef")]
#[derive(Debug, Default)]
pub struct User {
    pub id: u64,

    #[encrypted]
    pub email: Option<String>,

    #[encrypted(encode)]
    pub phone: Option<String>
}

fn main() {
    let mut user = User::default();
    user.set_email(Some("jane@example.com".to_string())).unwrap();
    user.set_phone(Some("555-0100".to_string())).unwrap();

    let _: Option<&Vec<u8>> = user.encrypted_email();
    let _: Option<&String> = user.encrypted_phone();
    let _: Option<&String> = user.email().unwrap();

    assert!(User::is_attr_encrypted("email"));
    assert!(!User::is_attr_encrypted("id"));
}
