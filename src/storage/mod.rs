//! Snapshot persistence for fitted classifier parameters.
//!
//! A snapshot is a single `rkyv` file. Writes go to a temporary sibling that is
//! fsynced and renamed into place, so readers never observe a half-written
//! file. Reads memory-map the file and validate the archive before
//! deserializing.

pub mod error;
mod model;
pub mod path;


pub use error::{StorageError, StorageResult};
pub use model::{ArchivedModelSnapshot, ModelSnapshot};
pub use path::{ensure_parent_dirs, expand_path};

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use memmap2::Mmap;
use rkyv::rancor::Error as RkyvError;
use rkyv::{from_bytes, to_bytes};
use tracing::{debug, warn};

use crate::constants::{SNAPSHOT_FORMAT_VERSION, SNAPSHOT_TEMP_SUFFIX};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Reads and writes one [`ModelSnapshot`] file.
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a handle for `path` after `~` expansion. Touches nothing on disk.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: expand_path(path),
        }
    }

    /// Returns the resolved snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a snapshot file is present.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Per-write sibling path `<name>.<pid>.<seq>.tmp`, unique across
    /// concurrent writers to the same snapshot.
    fn temp_path(&self) -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name: OsString = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(format!(".{}.{seq}.{SNAPSHOT_TEMP_SUFFIX}", std::process::id()));
        self.path.with_file_name(name)
    }

    /// Writes `snapshot`, replacing any previous file atomically.
    ///
    /// On failure the temporary file is removed and any previous snapshot is
    /// left untouched.
    pub fn write(&self, snapshot: &ModelSnapshot) -> StorageResult<()> {
        ensure_parent_dirs(&self.path)?;

        let bytes = to_bytes::<RkyvError>(snapshot)
            .map_err(|e| StorageError::Serialization(format!("{:?}", e)))?;

        let temp_path = self.temp_path();

        let result = (|| {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(err) = result {
            if let Err(cleanup) = fs::remove_file(&temp_path)
                && cleanup.kind() != io::ErrorKind::NotFound
            {
                warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "Failed to remove temporary snapshot"
                );
            }
            return Err(err.into());
        }

        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            rows = snapshot.labels.len(),
            "Wrote snapshot"
        );

        Ok(())
    }

    /// Reads and validates the snapshot.
    pub fn read(&self) -> StorageResult<ModelSnapshot> {
        if !self.exists() {
            return Err(StorageError::NotFound {
                path: self.path.clone(),
            });
        }

        let file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Err(StorageError::Serialization(format!(
                "snapshot file is empty: {}",
                self.path.display()
            )));
        }

        // SAFETY: The file is opened read-only and the mapping is dropped before
        // returning. Writers replace snapshots by rename, never in place.
        let mmap = unsafe { Mmap::map(&file)? };

        let snapshot = from_bytes::<ModelSnapshot, RkyvError>(&mmap[..])
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if snapshot.version != SNAPSHOT_FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        snapshot
            .features
            .validate()
            .map_err(|e| StorageError::Serialization(format!("corrupt feature matrix: {e}")))?;

        if snapshot.features.rows() != snapshot.labels.len() {
            return Err(StorageError::Serialization(format!(
                "snapshot has {} vectors but {} labels",
                snapshot.features.rows(),
                snapshot.labels.len()
            )));
        }

        debug!(
            path = %self.path.display(),
            rows = snapshot.labels.len(),
            "Read snapshot"
        );

        Ok(snapshot)
    }

    /// Deletes the snapshot file.
    pub fn remove(&self) -> StorageResult<()> {
        if !self.exists() {
            return Err(StorageError::NotFound {
                path: self.path.clone(),
            });
        }

        fs::remove_file(&self.path)?;
        Ok(())
    }
}
