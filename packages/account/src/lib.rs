#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User sign-up and login.
//!
//! [`AccountService`] reads accounts fresh from its [`AccountRepository`] on
//! every call and rewrites the whole collection on every change. Changes
//! made through one service are serialized, so two sign-ups for the same
//! username cannot both succeed.

pub mod credentials;
pub mod repository;

use std::sync::{Mutex, PoisonError};

use hotline_account_models::UserAccount;
use thiserror::Error;

pub use repository::{AccountRepository, FileAccountRepository, MemoryAccountRepository};

/// Why a sign-up was rejected. The display text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupError {
    /// At least one field was empty.
    #[error("All fields are required.")]
    MissingFields,

    /// An account with this username already exists.
    #[error("Username already exists!")]
    UsernameTaken,

    /// The account file could not be written.
    #[error("Failed to save account. Please try again.")]
    SaveFailed,
}

/// Account operations over a repository.
#[derive(Debug)]
pub struct AccountService<R> {
    repository: R,
    write_lock: Mutex<()>,
}

impl<R: AccountRepository> AccountService<R> {
    /// Service over `repository`.
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    /// The wrapped repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Every stored account.
    #[must_use]
    pub fn accounts(&self) -> Vec<UserAccount> {
        self.repository.load_all()
    }

    /// Whether an account with exactly this username exists.
    #[must_use]
    pub fn username_exists(&self, username: &str) -> bool {
        self.repository
            .load_all()
            .iter()
            .any(|account| account.username == username)
    }

    /// Creates an account and rewrites the account file.
    ///
    /// # Errors
    ///
    /// * [`SignupError::MissingFields`] if any argument is empty
    /// * [`SignupError::UsernameTaken`] if the username is already in use
    /// * [`SignupError::SaveFailed`] if the account file could not be written
    pub fn signup(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserAccount, SignupError> {
        if [username, password, first_name, last_name]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(SignupError::MissingFields);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut accounts = self.repository.load_all();
        if accounts.iter().any(|account| account.username == username) {
            log::debug!("Sign-up rejected, username {username:?} is taken");
            return Err(SignupError::UsernameTaken);
        }

        let mut account = UserAccount {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ..Default::default()
        };
        credentials::set_password(&mut account, password);
        accounts.push(account.clone());

        if !self.repository.rewrite_all(&accounts) {
            return Err(SignupError::SaveFailed);
        }

        log::info!("Created account {username:?}");
        Ok(account)
    }

    /// Whether `username` and `password` match a stored account.
    ///
    /// An account still holding a plaintext password is upgraded to a
    /// salted digest on its first successful login. A failed upgrade is
    /// logged and does not affect the result.
    #[must_use]
    pub fn login(&self, username: &str, password: &str) -> bool {
        let Some(account) = self
            .repository
            .load_all()
            .into_iter()
            .find(|account| account.username == username)
        else {
            return false;
        };

        if !credentials::verify_password(&account, password) {
            return false;
        }

        if account.has_legacy_password() {
            self.upgrade_legacy_password(username, password);
        }

        true
    }

    fn upgrade_legacy_password(&self, username: &str, password: &str) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut accounts = self.repository.load_all();
        let Some(account) = accounts
            .iter_mut()
            .find(|account| account.username == username && account.has_legacy_password())
        else {
            return;
        };
        credentials::set_password(account, password);

        if self.repository.rewrite_all(&accounts) {
            log::info!("Upgraded stored password for {username:?}");
        } else {
            log::warn!("Could not upgrade stored password for {username:?}");
        }
    }
}
