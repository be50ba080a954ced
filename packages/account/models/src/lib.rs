#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User account record types.
//!
//! Accounts store a salted password digest. Files written before hashing
//! was introduced carry a plaintext `password` field instead; it is kept on
//! the type so those accounts can still log in and be re-hashed.

use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserAccount {
    /// Login name, unique among all accounts.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Hex-encoded random salt mixed into [`Self::password_hash`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub salt: String,
    /// Hex-encoded password digest.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password_hash: String,
    /// Plaintext password from files written before hashing existed.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl UserAccount {
    /// Whether this account still stores a plaintext password and no digest.
    #[must_use]
    pub fn has_legacy_password(&self) -> bool {
        self.password_hash.is_empty() && !self.password.is_empty()
    }

    /// Full display name (`"First Last"`).
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
