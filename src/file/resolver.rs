//! Hierarchical path resolution for the shelf.
//!
//! Maps an ordered sequence of path segments (folder names followed by a
//! filename) to the unique file whose logical path equals the sequence.
//!
//! A naive query would join `folders` once per segment, which blows up the
//! query plan for paths thousands of components deep. Instead the filter
//! joins at most [`MAX_JOINS`] ancestors, nearest the file first, and paths
//! deeper than that get a second pass: every candidate sharing the joined
//! suffix has its full ancestor chain walked and compared exactly.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::entry::StoredFile;
use super::folder::FolderRepository;
use crate::{Result, ShelfError};

/// Maximum number of folder joins embedded in a single lookup query.
pub const MAX_JOINS: usize = 5;

/// Resolves segment sequences against the folder tree.
pub struct PathResolver<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PathResolver<'a> {
    /// Create a new PathResolver with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve `["foo", "bar", "baz.png"]` to the file at `foo/bar/baz.png`.
    ///
    /// A file matches by its effective name: the explicit `name` when set
    /// and non-empty, otherwise `original_filename`. The full ancestor
    /// chain must match the folder segments exactly, in order, and the top
    /// of the chain must be a root folder.
    ///
    /// Returns `ShelfError::InvalidPath` for an empty sequence and
    /// `ShelfError::NotFound` when no file has that logical path.
    pub async fn resolve<S: AsRef<str>>(&self, parts: &[S]) -> Result<StoredFile> {
        let Some((filename, folder_names)) = parts.split_last() else {
            return Err(ShelfError::InvalidPath(
                "at least one path segment (the filename) is required".to_string(),
            ));
        };
        let filename = filename.as_ref();
        let joined = folder_names.len().min(MAX_JOINS);

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT f.id, f.name, f.original_filename, f.stored_name, f.size, f.folder_id, f.created_at \
             FROM files f",
        );

        // d0 is the file's own folder, d1 its parent, and so on upward.
        for i in 0..joined {
            if i == 0 {
                query.push(" JOIN folders d0 ON d0.id = f.folder_id");
            } else {
                query.push(format!(
                    " JOIN folders d{i} ON d{i}.id = d{}.parent_id",
                    i - 1
                ));
            }
        }

        query.push(" WHERE (((f.name IS NULL OR f.name = '') AND f.original_filename = ");
        query.push_bind(filename);
        query.push(") OR f.name = ");
        query.push_bind(filename);
        query.push(")");

        // Constrain the folder names nearest the leaf; they are the most
        // selective part of the path.
        for (i, name) in folder_names.iter().rev().take(MAX_JOINS).enumerate() {
            query.push(format!(" AND d{i}.name = "));
            query.push_bind(name.as_ref());
        }

        if folder_names.len() <= MAX_JOINS {
            // Every ancestor is covered by a join, so pinning the top of
            // the chain to the root makes the match exact.
            if joined == 0 {
                query.push(" AND f.folder_id IS NULL");
            } else {
                query.push(format!(" AND d{}.parent_id IS NULL", joined - 1));
            }
            query.push(" ORDER BY f.id LIMIT 1");

            let file = query
                .build_query_as::<StoredFile>()
                .fetch_optional(self.pool)
                .await?;

            file.ok_or_else(|| ShelfError::NotFound(format!("file '{filename}'")))
        } else {
            // The joins only checked a suffix of the path, so any file
            // whose nearest ancestors share those names is a candidate.
            // Walk each candidate's full chain and compare exactly.
            query.push(" ORDER BY f.id");

            let candidates = query
                .build_query_as::<StoredFile>()
                .fetch_all(self.pool)
                .await?;

            let folders = FolderRepository::new(self.pool);
            for candidate in candidates {
                let Some(folder_id) = candidate.folder_id else {
                    continue;
                };
                let chain = folders.ancestor_path(folder_id).await?;
                if chain.len() == folder_names.len()
                    && chain
                        .iter()
                        .zip(folder_names)
                        .all(|(folder, name)| folder.name == name.as_ref())
                {
                    return Ok(candidate);
                }
            }

            Err(ShelfError::NotFound(format!("file '{filename}'")))
        }
    }
}
