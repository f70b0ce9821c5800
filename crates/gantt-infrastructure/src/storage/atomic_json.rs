//! Atomic JSON file operations.
//!
//! A thin layer for safe access to the JSON files this application owns:
//! updates are all-or-nothing (temp file + fsync + atomic rename), and an
//! advisory file lock keeps concurrent writers from interleaving.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use gantt_core::error::{GanttError, Result};

/// A handle to an atomically written JSON file.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file's raw text without deserializing.
    ///
    /// Returns `None` when the file doesn't exist or is empty. Corrupt
    /// content is the caller's concern; this layer only moves bytes.
    pub fn load_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    /// Loads and deserializes the file.
    ///
    /// Returns `None` when the file doesn't exist or is empty.
    pub fn load(&self) -> Result<Option<T>> {
        let Some(content) = self.load_raw()? else {
            return Ok(None);
        };
        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes and saves data atomically under the file lock.
    ///
    /// The pretty-printed JSON is written to a temporary file in the same
    /// directory, fsynced, then renamed over the target.
    pub fn save(&self, data: &T) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Removes the file; a missing file is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| GanttError::io("path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| GanttError::io("path has no file name"))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// An advisory lock guard released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| GanttError::storage(format!("failed to acquire lock: {e}")))?;
        }

        // Non-Unix platforms run without advisory locking; acceptable for a
        // single-user desktop application.

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped.
        let _ = fs::remove_file(&self.lock_path);
    }
}
