// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parsing of `#[attr_encrypted]` input.
//!
//! | Module | Parses |
//! |--------|--------|
//! | [`options`] | option lists shared by both attribute levels |
//! | [`field`] | `#[encrypted(...)]` fields |
//! | [`record`] | the struct, its defaults and storage slots |

pub mod field;
pub mod options;
pub mod record;

pub use field::{EncryptedField, SlotOrigin, StorageSlot};
pub use options::{DynamicArg, EncodeArg, MarshalerArg, OptionsArgs};
pub use record::{EncryptedAttr, RecordDef};
