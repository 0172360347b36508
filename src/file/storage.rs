//! Physical byte storage for the shelf.
//!
//! Files are stored under UUID-based names, sharded into subdirectories by
//! the first two characters of the name:
//!
//! ```text
//! {base_path}/
//! ├── ab/
//! │   └── ab12cd34-5678-90ab-cdef-123456789012.txt
//! └── cd/
//!     └── cd90ab12-3456-7890-abcd-ef1234567890.png
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Result, ShelfError};

/// On-disk byte store keyed by stored names.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save content under a fresh UUID-based stored name.
    ///
    /// The extension is taken from `original_name`. Returns the stored name.
    pub fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        let uuid = Uuid::new_v4();
        let ext = Self::extract_extension(original_name);
        let stored_name = format!("{uuid}.{ext}");

        self.save_with_name(content, &stored_name)?;
        Ok(stored_name)
    }

    /// Save content under a specific stored name.
    pub fn save_with_name(&self, content: &[u8], stored_name: &str) -> Result<()> {
        let file_path = self.shard_path(stored_name);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&file_path, content)?;

        Ok(())
    }

    /// Load the bytes stored under a stored name.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let file_path = self.shard_path(stored_name);

        match fs::read(&file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShelfError::NotFound(format!("stored file '{stored_name}'")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file.
    ///
    /// Returns `true` if it was deleted, `false` if it didn't exist.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        let file_path = self.shard_path(stored_name);

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a stored name exists on disk.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.shard_path(stored_name).exists()
    }

    /// Full path of a stored name, including the shard directory.
    ///
    /// Generated names are ASCII, but callers may pass their own; a name
    /// without a two-byte character boundary shards to itself.
    fn shard_path(&self, stored_name: &str) -> PathBuf {
        let shard = stored_name.get(..2).unwrap_or(stored_name);
        self.base_path.join(shard).join(stored_name)
    }

    /// Extension of the original filename, or "bin" when it has none.
    fn extract_extension(original_name: &str) -> &str {
        Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
    }
}
