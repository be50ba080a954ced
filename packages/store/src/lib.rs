#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flat-file storage for hotline records.
//!
//! A [`RecordStore`] owns one file holding one kind of record. Every load
//! re-reads and re-decodes the whole file; there is no cache. Writes either
//! append a single line or rewrite the file through a temp file and a
//! rename, so a crash mid-rewrite leaves the previous contents intact.
//!
//! There is no locking. A single writer per file is assumed.

pub mod config;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use hotline_codec::{CodecError, Layout, Record};
use thiserror::Error;

pub use config::{ConfigError, StoreConfig};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation was acting on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A record could not be encoded.
    #[error("Encoding error: {0}")]
    Codec(#[from] CodecError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// File-backed collection of records of type `R`.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    /// Creates a store over `path`. Nothing is touched on disk until the
    /// first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes every record in the file, in file order.
    ///
    /// A missing or zero-length file yields an empty collection. Malformed
    /// content is decoded leniently (see [`hotline_codec::decode`]).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    pub fn load_all(&self) -> Result<Vec<R>, StoreError> {
        let Some(text) = self.read_existing()? else {
            log::debug!("No store file at {}", self.path.display());
            return Ok(Vec::new());
        };

        let records = hotline_codec::decode(&text);
        log::debug!(
            "Loaded {} record(s) from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    /// Layout of the file's current contents ([`Layout::Empty`] when the
    /// file does not exist).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    pub fn layout(&self) -> Result<Layout, StoreError> {
        Ok(self
            .read_existing()?
            .map_or(Layout::Empty, |text| hotline_codec::detect_layout(&text)))
    }

    /// Appends one record as a new line at the end of the file, creating
    /// the file (and its directory) if needed.
    ///
    /// A file still in the legacy layout is copied to [`Self::backup_path`]
    /// and then rewritten in the line layout with the new record last. A
    /// file whose last line was torn (no trailing newline) gets a newline
    /// before the new record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be encoded or the file
    /// cannot be written.
    pub fn append(&self, record: &R) -> Result<(), StoreError> {
        let line = hotline_codec::encode(record)?;
        let existing = self.read_existing()?;

        if let Some(text) = existing.as_deref() {
            if hotline_codec::detect_layout(text) == Layout::Legacy {
                let records: Vec<R> = hotline_codec::decode(text);
                self.backup()?;
                log::info!(
                    "Upgrading {} ({} record(s)) to the line layout",
                    self.path.display(),
                    records.len()
                );
                let mut contents = hotline_codec::encode_lines(&records)?;
                contents.push_str(&line);
                contents.push('\n');
                return self.write_atomically(&contents);
            }
        }

        let mut buf = String::with_capacity(line.len() + 2);
        if existing
            .as_deref()
            .is_some_and(|text| !text.is_empty() && !text.ends_with('\n'))
        {
            log::warn!(
                "{} does not end with a newline; previous write may be torn",
                self.path.display()
            );
            buf.push('\n');
        }
        buf.push_str(&line);
        buf.push('\n');

        self.ensure_parent()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error(&self.path))?;
        file.write_all(buf.as_bytes())
            .and_then(|()| file.flush())
            .map_err(io_error(&self.path))?;

        log::debug!("Appended record to {}", self.path.display());
        Ok(())
    }

    /// Replaces the whole file with `records` in the line layout.
    ///
    /// A file still in the legacy layout is first copied to
    /// [`Self::backup_path`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any record cannot be encoded or the file
    /// cannot be written.
    pub fn rewrite_all(&self, records: &[R]) -> Result<(), StoreError> {
        let contents = hotline_codec::encode_lines(records)?;
        if self.layout()? == Layout::Legacy {
            self.backup()?;
        }
        self.write_atomically(&contents)?;
        log::debug!(
            "Rewrote {} with {} record(s)",
            self.path.display(),
            records.len()
        );
        Ok(())
    }

    /// Sibling file that [`Self::backup`] copies to (`<file>.bak`).
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        self.sibling("bak")
    }

    /// Copies the current file to [`Self::backup_path`], replacing any
    /// earlier backup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be copied.
    pub fn backup(&self) -> Result<PathBuf, StoreError> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(io_error(&backup))?;
        log::info!("Backed up {} to {}", self.path.display(), backup.display());
        Ok(backup)
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".");
        name.push(extension);
        self.path.with_file_name(name)
    }

    /// Returns the file contents, or `None` if the file does not exist.
    fn read_existing(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&self.path)(e)),
        }
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(io_error(parent))
            }
            _ => Ok(()),
        }
    }

    /// Writes `contents` to a sibling temp file, syncs it, then renames it
    /// over the store file.
    fn write_atomically(&self, contents: &str) -> Result<(), StoreError> {
        self.ensure_parent()?;

        let tmp_path = self.sibling("tmp");

        let mut file = File::create(&tmp_path).map_err(io_error(&tmp_path))?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(io_error(&tmp_path))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(io_error(&self.path))
    }
}
