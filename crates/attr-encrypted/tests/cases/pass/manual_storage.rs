// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Storage field declared by hand, with a custom prefix and suffix.

use attr_encrypted::attr_encrypted;

#[attr_encrypted(key = "0123456789abcdef0123456789abcdef", prefix = "crypt_", suffix = "_v1")]
#[derive(Debug, Default)]
pub struct Patient {
    #[encrypted(encode = "base64url")]
    ssn: Option<String>,

    crypt_ssn_v1: Option<String>,

    #[encrypted]
    notes: Option<Vec<u8>>
}

fn main() {
    let mut patient = Patient::default();
    patient.set_ssn(Some("078-05-1120".to_string())).unwrap();
    assert!(patient.crypt_ssn_v1.is_some());

    patient.set_notes(Some(vec![1, 2, 3])).unwrap();
    let _: Option<&Vec<u8>> = patient.crypt_notes_v1();
}
