//! File shelf domain: the folder tree, file entries, the path resolver and
//! physical byte storage.

mod entry;
mod folder;
mod resolver;
mod storage;

pub use entry::{FileRepository, NewStoredFile, StoredFile};
pub use folder::{Folder, FolderRepository, NewFolder};
pub use resolver::{PathResolver, MAX_JOINS};
pub use storage::FileStorage;
