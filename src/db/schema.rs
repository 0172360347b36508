//! Database schema and migrations for fileshelf.
//!
//! Migrations are applied sequentially when the database is opened; the
//! schema_version table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: folder tree
    r#"
-- Folders form a tree via parent_id; NULL parent means a root folder.
CREATE TABLE folders (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    parent_id   INTEGER REFERENCES folders(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_folders_parent_id ON folders(parent_id);
CREATE INDEX idx_folders_name ON folders(name);
"#,
    // v2: file entries
    r#"
-- name is the explicit display name and may be NULL or empty, in which
-- case original_filename is the effective name. folder_id NULL means the
-- file sits at the root.
CREATE TABLE files (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    name                TEXT,
    original_filename   TEXT NOT NULL,
    stored_name         TEXT NOT NULL UNIQUE,
    size                INTEGER NOT NULL DEFAULT 0,
    folder_id           INTEGER REFERENCES folders(id) ON DELETE CASCADE,
    created_at          TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_folder_id ON files(folder_id);
CREATE INDEX idx_files_name ON files(name);
CREATE INDEX idx_files_original_filename ON files(original_filename);
"#,
];
