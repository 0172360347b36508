//! Stored file types and repository.

use sqlx::SqlitePool;

use crate::{Result, ShelfError};

/// A file entry on the shelf.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredFile {
    /// Unique file ID.
    pub id: i64,
    /// Explicit display name. May be NULL or empty; see `effective_name`.
    pub name: Option<String>,
    /// Filename the file was uploaded with.
    pub original_filename: String,
    /// Physical storage key (UUID.ext format).
    pub stored_name: String,
    /// File size in bytes.
    pub size: i64,
    /// Owning folder ID (None for root-level files).
    pub folder_id: Option<i64>,
    /// When the file was created.
    pub created_at: String,
}

impl StoredFile {
    /// The name the file is addressed by: the explicit name when set and
    /// non-empty, otherwise the original upload filename.
    pub fn effective_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.original_filename,
        }
    }
}

/// Data for creating a new file entry.
#[derive(Debug, Clone)]
pub struct NewStoredFile {
    /// Explicit display name.
    pub name: Option<String>,
    /// Filename the file was uploaded with.
    pub original_filename: String,
    /// Physical storage key.
    pub stored_name: String,
    /// File size in bytes.
    pub size: i64,
    /// Owning folder ID (None for root-level files).
    pub folder_id: Option<i64>,
}

impl NewStoredFile {
    /// Create a new entry with an explicit display name.
    pub fn new(name: impl Into<String>, stored_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            original_filename: name.clone(),
            name: Some(name),
            stored_name: stored_name.into(),
            size: 0,
            folder_id: None,
        }
    }

    /// Create an entry with no explicit name, addressed by its original
    /// upload filename only.
    pub fn from_upload(original_filename: impl Into<String>, stored_name: impl Into<String>) -> Self {
        Self {
            name: None,
            original_filename: original_filename.into(),
            stored_name: stored_name.into(),
            size: 0,
            folder_id: None,
        }
    }

    /// Set the owning folder.
    pub fn in_folder(mut self, folder_id: i64) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Set the file size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }
}

/// Repository for file entry operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new file entry.
    pub async fn create(&self, file: &NewStoredFile) -> Result<StoredFile> {
        let result = sqlx::query(
            "INSERT INTO files (name, original_filename, stored_name, size, folder_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&file.name)
        .bind(&file.original_filename)
        .bind(&file.stored_name)
        .bind(file.size)
        .bind(file.folder_id)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(
            "SELECT id, name, original_filename, stored_name, size, folder_id, created_at
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// List files in a folder, or root-level files when `folder_id` is None.
    pub async fn list_by_folder(&self, folder_id: Option<i64>) -> Result<Vec<StoredFile>> {
        let files = match folder_id {
            Some(folder_id) => {
                sqlx::query_as::<_, StoredFile>(
                    "SELECT id, name, original_filename, stored_name, size, folder_id, created_at
                     FROM files WHERE folder_id = ? ORDER BY id",
                )
                .bind(folder_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StoredFile>(
                    "SELECT id, name, original_filename, stored_name, size, folder_id, created_at
                     FROM files WHERE folder_id IS NULL ORDER BY id",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(files)
    }

    /// Delete a file entry by ID.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
