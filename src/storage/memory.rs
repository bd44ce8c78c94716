//! In-memory directory tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{Result, TextMapError};
use crate::storage::{FileEntry, IndexFileSystem};

/// A file system that only exists in memory.
///
/// Entries are keyed by absolute path; the value records whether the entry
/// is a directory. Creating an entry creates all missing ancestors.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    entries: RwLock<BTreeMap<PathBuf, bool>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory and all of its missing parents.
    pub fn create_dir_all(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut entries = self.entries.write();
        if entries.get(path) == Some(&false) {
            return Err(TextMapError::storage(format!(
                "{} is a file",
                path.display()
            )));
        }
        Self::insert_ancestors(&mut entries, path)?;
        entries.insert(path.to_path_buf(), true);
        Ok(())
    }

    /// Create an empty file, creating missing parent directories.
    pub fn create_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut entries = self.entries.write();
        if entries.get(path) == Some(&true) {
            return Err(TextMapError::storage(format!(
                "{} is a directory",
                path.display()
            )));
        }
        Self::insert_ancestors(&mut entries, path)?;
        entries.insert(path.to_path_buf(), false);
        Ok(())
    }

    /// Number of entries, files and directories alike.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn insert_ancestors(entries: &mut BTreeMap<PathBuf, bool>, path: &Path) -> Result<()> {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            match entries.get(ancestor) {
                Some(true) => {}
                Some(false) => {
                    return Err(TextMapError::storage(format!(
                        "{} is a file",
                        ancestor.display()
                    )));
                }
                None => {
                    entries.insert(ancestor.to_path_buf(), true);
                }
            }
        }
        Ok(())
    }
}

impl IndexFileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.entries.read().contains_key(path))
    }

    fn list_entries(
        &self,
        path: &Path,
        predicate: &dyn Fn(&FileEntry) -> bool,
    ) -> Result<Vec<FileEntry>> {
        let entries = self.entries.read();
        match entries.get(path) {
            None => return Ok(Vec::new()),
            Some(false) => {
                return Err(TextMapError::storage(format!(
                    "{} is not a directory",
                    path.display()
                )));
            }
            Some(true) => {}
        }

        Ok(entries
            .range(path.to_path_buf()..)
            .skip(1)
            .take_while(|(p, _)| p.starts_with(path))
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, &is_dir)| FileEntry {
                path: p.clone(),
                is_dir,
            })
            .filter(|entry| predicate(entry))
            .collect())
    }

    fn delete_recursive(&self, path: &Path) -> Result<()> {
        self.entries.write().retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list() {
        let fs = MemoryFileSystem::new();
        fs.create_dir_all("/t/0/idx1/s1").unwrap();
        fs.create_dir_all("/t/0/idx1/s2").unwrap();
        fs.create_file("/t/0/idx1/s2/segments").unwrap();
        fs.create_file("/t/0/idx1/lock").unwrap();
        fs.create_dir_all("/t/0/idx10/s9").unwrap();

        let mut names: Vec<String> = fs
            .list_directories(Path::new("/t/0/idx1"))
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["s1", "s2"]);

        let all = fs.list_entries(Path::new("/t/0/idx1"), &|_| true).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_list_file_is_error() {
        let fs = MemoryFileSystem::new();
        fs.create_file("/t/0/data").unwrap();
        assert!(fs.list_directories(Path::new("/t/0/data")).is_err());
    }

    #[test]
    fn test_file_parent_rejected() {
        let fs = MemoryFileSystem::new();
        fs.create_file("/t/0/data").unwrap();
        assert!(fs.create_dir_all("/t/0/data/child").is_err());
    }

    #[test]
    fn test_delete_recursive_keeps_siblings() {
        let fs = MemoryFileSystem::new();
        fs.create_dir_all("/t/0/idx1/s1").unwrap();
        fs.create_dir_all("/t/0/idx10/s1").unwrap();

        fs.delete_recursive(Path::new("/t/0/idx1")).unwrap();
        assert!(!fs.exists(Path::new("/t/0/idx1")).unwrap());
        assert!(!fs.exists(Path::new("/t/0/idx1/s1")).unwrap());
        assert!(fs.exists(Path::new("/t/0/idx10/s1")).unwrap());

        fs.delete_recursive(Path::new("/t/0/idx1")).unwrap();
    }
}
