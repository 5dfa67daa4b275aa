//! Backing document
//!
//! Loads and persists the full record collection as a JSON array.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, VaultError};
use crate::record::Videogame;

/// Suffix appended to the document file name for the staging file
const TMP_SUFFIX: &str = ".tmp";

/// The on-disk JSON file backing a store
#[derive(Debug, Clone)]
pub struct Document {
    /// Target document path
    path: PathBuf,

    /// Indent output
    pretty: bool,
}

impl Document {
    /// Create a document handle (does not touch the filesystem)
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    /// Read the collection from disk
    ///
    /// Never fails: a missing, empty, unreadable or corrupt document all
    /// yield an empty collection.
    pub fn load(&self) -> Vec<Videogame> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No document at {}, starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Cannot read {}: {}, starting empty", self.path.display(), e);
                return Vec::new();
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!("Document {} is empty", self.path.display());
            return Vec::new();
        }

        match serde_json::from_slice::<Vec<Videogame>>(&bytes) {
            Ok(records) => {
                tracing::debug!("Loaded {} records from {}", records.len(), self.path.display());
                records
            }
            Err(e) => {
                tracing::warn!("Corrupt document {}: {}, starting empty", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Overwrite the document with the full collection
    ///
    /// Steps:
    /// 1. Serialize into a sibling staging file
    /// 2. fsync the staging file
    /// 3. Rename it over the document
    /// 4. fsync the parent directory (unix)
    ///
    /// Only steps 1-3 can fail the call. Once the rename succeeded the
    /// document holds the new collection, so a step 4 failure is logged.
    pub fn persist(&self, records: &[Videogame]) -> Result<()> {
        let tmp_path = self.tmp_path()?;

        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent)?;
        }

        if let Err(e) = self.write_staging(&tmp_path, records) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        // The new content is in place from here on; a failed directory sync
        // only weakens durability and must not be reported as a lost write.
        if let Some(parent) = self.parent_dir() {
            if let Err(e) = sync_dir(parent) {
                tracing::warn!("Cannot sync directory {}: {}", parent.display(), e);
            }
        }

        tracing::trace!("Persisted {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn write_staging(&self, tmp_path: &Path, records: &[Videogame]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;

        let mut writer = BufWriter::new(file);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, records)?;
        } else {
            serde_json::to_writer(&mut writer, records)?;
        }
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| VaultError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    }

    /// "videogames.json" → "videogames.json.tmp"
    fn tmp_path(&self) -> Result<PathBuf> {
        let name = self.path.file_name().ok_or_else(|| {
            VaultError::Config(format!("Document path has no file name: {}", self.path.display()))
        })?;
        let mut tmp_name = OsString::from(name);
        tmp_name.push(TMP_SUFFIX);
        Ok(self.path.with_file_name(tmp_name))
    }

    /// Parent directory, `None` for a bare file name
    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

/// Make the rename durable
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
