//! Storage backends for user accounts.
//!
//! The account file is always rewritten whole, never appended to.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use hotline_account_models::UserAccount;
use hotline_store::{RecordStore, StoreConfig};

/// Persistence for user accounts.
pub trait AccountRepository: Send + Sync {
    /// Every stored account in storage order.
    fn load_all(&self) -> Vec<UserAccount>;

    /// Replaces the stored accounts with `accounts`, returning whether the
    /// write succeeded.
    fn rewrite_all(&self, accounts: &[UserAccount]) -> bool;
}

/// [`AccountRepository`] backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileAccountRepository {
    store: RecordStore<UserAccount>,
}

impl FileAccountRepository {
    /// Repository over the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// Repository over the configured account file.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.accounts_path())
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore<UserAccount> {
        &self.store
    }
}

impl AccountRepository for FileAccountRepository {
    fn load_all(&self) -> Vec<UserAccount> {
        self.store.load_all().unwrap_or_else(|e| {
            log::error!("Failed to load accounts: {e}");
            Vec::new()
        })
    }

    fn rewrite_all(&self, accounts: &[UserAccount]) -> bool {
        match self.store.rewrite_all(accounts) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save accounts: {e}");
                false
            }
        }
    }
}

/// In-memory [`AccountRepository`] for tests.
#[derive(Debug, Default)]
pub struct MemoryAccountRepository {
    accounts: Mutex<Vec<UserAccount>>,
    reject_writes: bool,
}

impl MemoryAccountRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `accounts`.
    #[must_use]
    pub fn with_accounts(accounts: Vec<UserAccount>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            reject_writes: false,
        }
    }

    /// Repository whose writes always fail.
    #[must_use]
    pub fn rejecting_writes() -> Self {
        Self {
            accounts: Mutex::default(),
            reject_writes: true,
        }
    }
}

impl AccountRepository for MemoryAccountRepository {
    fn load_all(&self) -> Vec<UserAccount> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn rewrite_all(&self, accounts: &[UserAccount]) -> bool {
        if self.reject_writes {
            log::error!("Failed to save accounts: repository is read-only");
            return false;
        }
        *self.accounts.lock().unwrap_or_else(PoisonError::into_inner) = accounts.to_vec();
        true
    }
}
