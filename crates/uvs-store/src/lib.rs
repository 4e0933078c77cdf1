//! Durable order history.
//!
//! # Contract
//! - One pretty-printed UTF-8 JSON array per store file, records in
//!   insertion order. The on-disk layout is the legacy
//!   `orders_history.json` format and must stay loadable by older data.
//! - Append-only: records are never edited or deleted once written.
//! - A missing file is an empty store. A file that exists but cannot be
//!   read or parsed is [`StoreError`] — corrupt data is never masked by
//!   returning an empty list.
//! - `append` is a load-append-rewrite sequence guarded by a store-scoped
//!   mutex, and the rewrite lands via temp-file + rename so a crash
//!   mid-write cannot leave a half-written file behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;
use uvs_schemas::OrderRecord;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Failure while reading or rewriting the order history file.
///
/// `Corrupt` means the file exists but is not a valid record array; callers
/// must surface it rather than treating the store as empty.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "STORE_IO path={:?}: {}", path, source)
            }
            StoreError::Corrupt { path, source } => {
                write!(f, "STORE_CORRUPT path={:?}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Corrupt { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// OrderStore
// ---------------------------------------------------------------------------

/// Append-only collection of [`OrderRecord`] backed by one JSON file.
#[derive(Debug)]
pub struct OrderStore {
    path: PathBuf,
    // Serializes the load-append-rewrite sequence so two concurrent
    // placements cannot both read the same snapshot and drop a record.
    write_lock: Mutex<()>,
}

impl OrderStore {
    /// Wraps the given history file path. Nothing is touched on disk until
    /// the first `load`/`append`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All persisted records in insertion order. Empty when no file exists
    /// yet.
    pub fn load(&self) -> Result<Vec<OrderRecord>, StoreError> {
        let _guard = self.lock();
        self.read_all()
    }

    /// Durably adds one record: load the full set, append, rewrite the
    /// whole file atomically.
    pub fn append(&self, record: OrderRecord) -> Result<(), StoreError> {
        let _guard = self.lock();

        let mut records = self.read_all()?;
        records.push(record);
        self.rewrite(&records)?;

        debug!(
            path = %self.path.display(),
            total = records.len(),
            "order appended"
        );
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock only means another append panicked after the
        // rename already happened or not at all; the file itself is intact
        // either way, so recover the guard and continue.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt {
            path: self.path.clone(),
            source: err,
        })
    }

    /// Whole-file replace: write a sibling temp file, flush + fsync, then
    /// rename over the live path. Readers see the old array or the new one,
    /// never a torn write.
    fn rewrite(&self, records: &[OrderRecord]) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let body = serde_json::to_string_pretty(records).map_err(|err| StoreError::Corrupt {
            path: self.path.clone(),
            source: err,
        })?;

        let tmp_path = self.tmp_path();
        let mut tmp = File::create(&tmp_path).map_err(io_err)?;
        tmp.write_all(body.as_bytes()).map_err(io_err)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.sync_all().map_err(io_err)?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "orders_history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
