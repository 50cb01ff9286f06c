// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Option resolution seen through generated accessors: the `if`/`unless`
//! gate, per-record keys and encryptor extras.

mod common;

use attr_encrypted::{
    Dynamic, EncryptedAttributes, Encryptor, EncryptorArgs, Result, attr_encrypted
};
use common::{Xor, xor};

#[attr_encrypted(encryptor = Xor, key = "k")]
#[derive(Debug, Default)]
struct Account {
    active: bool,
    locked: bool,

    #[encrypted(if = is_active, encode)]
    token: Option<String>,

    #[encrypted(unless = |a: &Account| a.locked)]
    pin: Option<String>,

    #[encrypted(if = false)]
    label: Option<String>
}

impl Account {
    fn is_active(&self) -> bool {
        self.active
    }
}

#[attr_encrypted(encryptor = Xor)]
#[derive(Debug, Default)]
struct Tenant {
    secret: String,

    #[encrypted(key = tenant_key)]
    note: Option<String>,

    #[encrypted(key = |t: &Tenant| format!("{}!", t.secret))]
    memo: Option<String>
}

impl Tenant {
    fn tenant_key(&self) -> String {
        self.secret.clone()
    }

    fn with_secret(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            ..Self::default()
        }
    }
}

/// Prefixes output with the `scope` extra, then XORs with the key.
#[derive(Debug, Default)]
struct Scoped;

impl Encryptor for Scoped {
    fn encrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        let scope = args.extra("scope").unwrap_or("none");
        let mut out = format!("{scope}:").into_bytes();
        out.extend(Xor.encrypt(args)?);
        Ok(out)
    }

    fn decrypt(&self, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        let scope = args.extra("scope").unwrap_or("none");
        let body = args
            .value
            .strip_prefix(format!("{scope}:").as_bytes())
            .ok_or(attr_encrypted::Error::Cipher)?;
        Xor.decrypt(EncryptorArgs::new(args.options, body))
    }

    fn call(&self, operation: &str, args: EncryptorArgs<'_>) -> Result<Vec<u8>> {
        match operation {
            "wrap" => self.encrypt(args),
            "unwrap" => self.decrypt(args),
            other => Err(attr_encrypted::Error::UnsupportedOperation {
                encryptor: self.name(),
                operation: other.to_string()
            })
        }
    }
}

#[attr_encrypted(
    encryptor = Scoped,
    key = "k",
    encrypt_method = "wrap",
    decrypt_method = "unwrap",
    scope = "records"
)]
#[derive(Debug, Default)]
struct Record {
    #[encrypted]
    body: Option<String>,

    #[encrypted(scope = "audit")]
    trail: Option<String>
}

#[test]
fn closed_if_gate_passes_plaintext_through() {
    let mut account = Account::default();
    account.set_token(Some("t0ken".to_string())).unwrap();
    assert_eq!(account.encrypted_token().map(String::as_str), Some("t0ken"));

    let mut reloaded = Account::default();
    reloaded.set_encrypted_token(Some("t0ken".to_string()));
    assert_eq!(reloaded.token().unwrap().map(String::as_str), Some("t0ken"));
}

#[test]
fn open_if_gate_encrypts() {
    let mut account = Account {
        active: true,
        ..Account::default()
    };
    account.set_token(Some("t0ken".to_string())).unwrap();
    let stored = account.encrypted_token().cloned().unwrap();
    assert_ne!(stored, "t0ken");

    let mut reloaded = Account {
        active: true,
        ..Account::default()
    };
    reloaded.set_encrypted_token(Some(stored));
    assert_eq!(reloaded.token().unwrap().map(String::as_str), Some("t0ken"));
}

#[test]
fn unless_closure_gates_per_record() {
    let mut open = Account::default();
    open.set_pin(Some("1234".to_string())).unwrap();
    assert_eq!(open.encrypted_pin().cloned(), Some(xor(b"1234", b"k")));

    let mut locked = Account {
        locked: true,
        ..Account::default()
    };
    locked.set_pin(Some("1234".to_string())).unwrap();
    assert_eq!(locked.encrypted_pin().cloned(), Some(b"1234".to_vec()));
}

#[test]
fn literal_false_gate_never_encrypts() {
    let mut account = Account {
        active: true,
        ..Account::default()
    };
    account.set_label(Some("public".to_string())).unwrap();
    assert_eq!(account.encrypted_label().cloned(), Some(b"public".to_vec()));
}

#[test]
fn method_key_is_resolved_per_record() {
    let mut alpha = Tenant::with_secret("alpha");
    let mut beta = Tenant::with_secret("beta");
    alpha.set_note(Some("hello".to_string())).unwrap();
    beta.set_note(Some("hello".to_string())).unwrap();

    assert_eq!(alpha.encrypted_note().cloned(), Some(xor(b"hello", b"alpha")));
    assert_eq!(beta.encrypted_note().cloned(), Some(xor(b"hello", b"beta")));

    let mut wrong = Tenant::with_secret("beta");
    wrong.set_encrypted_note(alpha.encrypted_note().cloned());
    assert_ne!(wrong.note().unwrap().map(String::as_bytes), Some(&b"hello"[..]));
}

#[test]
fn closure_key_is_resolved_per_record() {
    let mut tenant = Tenant::with_secret("s");
    tenant.set_memo(Some("m".to_string())).unwrap();
    assert_eq!(tenant.encrypted_memo().cloned(), Some(xor(b"m", b"s!")));
}

#[test]
fn resolution_leaves_declaration_untouched() {
    let spec = Tenant::encrypted_attributes().get("note").unwrap();
    let before = format!("{:?}", spec.options());

    for secret in ["one", "two", "three"] {
        let mut tenant = Tenant::with_secret(secret);
        tenant.set_note(Some("x".to_string())).unwrap();
        let effective = tenant.attribute_options("note").unwrap();
        assert_eq!(effective.key.unwrap().as_bytes(), secret.as_bytes());
    }

    assert_eq!(before, format!("{:?}", spec.options()));
    assert!(matches!(
        spec.options().key,
        Some(Dynamic::Method {
            name: "tenant_key",
            ..
        })
    ));
}

#[test]
fn extras_reach_the_encryptor() {
    let mut record = Record::default();
    record.set_body(Some("b".to_string())).unwrap();
    record.set_trail(Some("t".to_string())).unwrap();

    assert!(record.encrypted_body().unwrap().starts_with(b"records:"));
    assert!(record.encrypted_trail().unwrap().starts_with(b"audit:"));

    let mut reloaded = Record::default();
    reloaded.set_encrypted_body(record.encrypted_body().cloned());
    reloaded.set_encrypted_trail(record.encrypted_trail().cloned());
    assert_eq!(reloaded.body().unwrap().map(String::as_str), Some("b"));
    assert_eq!(reloaded.trail().unwrap().map(String::as_str), Some("t"));
}

#[test]
fn effective_options_report_routing() {
    let record = Record::default();
    let options = record.attribute_options("trail").unwrap();
    assert_eq!(options.encrypt_method, "wrap");
    assert_eq!(options.decrypt_method, "unwrap");
    assert_eq!(options.extra.get("scope").map(String::as_str), Some("audit"));
    assert!(record.attribute_options("missing").is_err());
}
