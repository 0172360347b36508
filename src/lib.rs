//! fileshelf - serves user-managed files from a database-backed folder tree.
//!
//! Files live in a folder hierarchy stored in SQLite. Request paths are
//! resolved against the tree with a bounded number of joins, so lookup cost
//! stays flat no matter how deep a path gets.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{Result, ShelfError};
pub use file::{
    FileRepository, FileStorage, Folder, FolderRepository, NewFolder, NewStoredFile, PathResolver,
    StoredFile, MAX_JOINS,
};
pub use web::{RedirectTable, WebServer};
