//! `std::fs` backed file system.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;
use crate::storage::{FileEntry, IndexFileSystem};

/// Local disk file system.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl IndexFileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(path.try_exists()?)
    }

    fn list_entries(
        &self,
        path: &Path,
        predicate: &dyn Fn(&FileEntry) -> bool,
    ) -> Result<Vec<FileEntry>> {
        let read_dir = match fs::read_dir(path) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry?;
            let entry = FileEntry {
                path: dir_entry.path(),
                is_dir: dir_entry.file_type()?.is_dir(),
            };
            if predicate(&entry) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn delete_recursive(&self, path: &Path) -> Result<()> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let removed = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        match removed {
            Ok(()) => Ok(()),
            // Lost a race with another deleter.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    #[test]
    fn test_list_directories_skips_files() {
        let dir = Builder::new().prefix("test_local_list").tempdir().unwrap();
        fs::create_dir_all(dir.path().join("idx1/shard_a")).unwrap();
        fs::create_dir_all(dir.path().join("idx1/shard_b")).unwrap();
        fs::write(dir.path().join("idx1/meta.json"), b"{}").unwrap();

        let fs_impl = LocalFileSystem::new();
        let mut names: Vec<String> = fs_impl
            .list_directories(&dir.path().join("idx1"))
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["shard_a", "shard_b"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = Builder::new().prefix("test_local_missing").tempdir().unwrap();
        let fs_impl = LocalFileSystem::new();
        assert!(fs_impl
            .list_directories(&dir.path().join("absent"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_delete_recursive() {
        let dir = Builder::new().prefix("test_local_delete").tempdir().unwrap();
        let target = dir.path().join("0/idx1");
        fs::create_dir_all(target.join("shard_a")).unwrap();
        fs::write(target.join("shard_a/postings"), b"data").unwrap();

        let fs_impl = LocalFileSystem::new();
        fs_impl.delete_recursive(&target).unwrap();
        assert!(!fs_impl.exists(&target).unwrap());
        assert!(fs_impl.exists(&dir.path().join("0")).unwrap());

        // Missing path is fine.
        fs_impl.delete_recursive(&target).unwrap();
    }
}
