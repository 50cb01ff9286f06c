// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Method, `Self::` path and closure options.

use attr_encrypted::{Encryptor, EncryptorArgs, Result, attr_encrypted};

struct Reverse;

impl Encryptor for Reverse {
    fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        Ok(args.value.iter().rev().copied().collect())
    }

    fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        Ok(args.value.iter().rev().copied().collect())
    }
}

#[attr_encrypted(encryptor = Reverse, key = Self::tenant_key)]
#[derive(Default)]
pub struct Document {
    tenant: String,
    archived: bool,

    #[encrypted(if = is_live, scope = "titles")]
    title: Option<String>,

    #[encrypted(unless = |d: &Document| d.archived, encode = "hex", marshal)]
    pages: Option<u32>
}

impl Document {
    fn tenant_key(&self) -> String {
        self.tenant.clone()
    }

    fn is_live(&self) -> bool {
        !self.archived
    }
}

fn main() {
    let mut document = Document::default();
    document.set_title(Some("draft".to_string())).unwrap();
    document.set_pages(Some(12)).unwrap();
    assert_eq!(document.title().unwrap().map(String::as_str), Some("draft"));
    assert_eq!(document.encrypted_pages().map(String::as_str), Some("3231"));
}
