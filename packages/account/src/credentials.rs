//! Password hashing.
//!
//! Digests are PBKDF2-HMAC-SHA256 over the password and a random
//! per-account salt, stored hex-encoded next to the salt.

use hotline_account_models::UserAccount;
use sha2::Sha256;
use subtle::ConstantTimeEq as _;

/// PBKDF2 rounds per digest.
pub const HASH_ITERATIONS: u32 = 100_000;

/// Digest length in bytes.
const DIGEST_LEN: usize = 32;

/// Fresh random salt (32 hex characters).
#[must_use]
pub fn generate_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Hex-encoded digest of `password` under `salt`.
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        HASH_ITERATIONS,
        &mut digest,
    );
    hex::encode(digest)
}

/// Stores a new salt and digest for `password` on `account`, dropping any
/// legacy plaintext password.
pub fn set_password(account: &mut UserAccount, password: &str) {
    account.salt = generate_salt();
    account.password_hash = hash_password(password, &account.salt);
    account.password.clear();
}

/// Whether `password` is the account's password.
///
/// Accounts without a digest are checked against their legacy plaintext
/// password. An account with neither never matches.
#[must_use]
pub fn verify_password(account: &UserAccount, password: &str) -> bool {
    if !account.password_hash.is_empty() {
        let candidate = hash_password(password, &account.salt);
        return constant_time_eq(candidate.as_bytes(), account.password_hash.as_bytes());
    }

    account.has_legacy_password() && constant_time_eq(password.as_bytes(), account.password.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
