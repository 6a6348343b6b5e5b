//! Filesystem primitives used by the reorganization engine.
//!
//! The engine only ever lists a directory, creates directories, checks for
//! existence and renames. [`FileSystem`] exposes exactly those four
//! operations and nothing that deletes, so any implementation handed to the
//! engine is non-destructive by construction.

use std::fs;
use std::io;
use std::path::Path;

/// What kind of object a directory entry is.
///
/// Symlinks and special files are `Other`: they are neither moved nor
/// reported as folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// One top-level entry of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Set when the on-disk name is not valid UTF-8 and `name` is only a
    /// lossy rendering of it. Such entries cannot be addressed by `name`.
    pub lossy: bool,
}

impl ListedEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            lossy: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
            lossy: false,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The narrow set of filesystem operations the engine is allowed to use.
pub trait FileSystem {
    /// Lists the top-level entries of `dir`, hidden entries included.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;

    /// Creates `dir` and any missing parents. Succeeds if it already exists.
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Returns whether anything (file or directory) exists at `path`.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Moves `from` to `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let os_name = entry.file_name();
            let Some(kind) = entry_kind(entry.file_type()) else {
                log::warn!(
                    "Skipping {}: could not read its type",
                    os_name.to_string_lossy()
                );
                continue;
            };
            entries.push(ListedEntry {
                name: os_name.to_string_lossy().to_string(),
                kind,
                lossy: os_name.to_str().is_none(),
            });
        }
        // read_dir order is platform dependent
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        // symlink_metadata so a dangling symlink still counts as taken
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Classifies an entry's type. An entry that vanished or became unreadable
/// between listing and inspection yields `None` and is left out.
fn entry_kind(file_type: io::Result<fs::FileType>) -> Option<EntryKind> {
    let file_type = file_type.ok()?;
    Some(if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_dir() {
        EntryKind::Dir
    } else {
        EntryKind::Other
    })
}

/// Returns true for dot-prefixed names, which are never listed or moved.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_reports_kinds_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("b.txt"), "b").unwrap();
        fs::write(base_path.join("a.pdf"), "a").unwrap();
        fs::create_dir(base_path.join("Folder")).unwrap();

        let entries = OsFileSystem.read_dir(base_path).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Folder", "a.pdf", "b.txt"]);
        assert!(entries[0].is_dir() && !entries[0].is_file());
        assert!(entries[1].is_file() && !entries[1].is_dir());
    }

    #[test]
    fn test_read_dir_missing_folder_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("gone");
        assert!(OsFileSystem.read_dir(&missing).is_err());
    }

    #[test]
    fn test_create_dir_all_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().join("Documents");
        OsFileSystem.create_dir_all(&dir).unwrap();
        OsFileSystem.create_dir_all(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_exists_sees_files_and_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("x.txt"), "x").unwrap();
        fs::create_dir(base_path.join("sub")).unwrap();

        assert!(OsFileSystem.exists(&base_path.join("x.txt")).unwrap());
        assert!(OsFileSystem.exists(&base_path.join("sub")).unwrap());
        assert!(!OsFileSystem.exists(&base_path.join("y.txt")).unwrap());
    }

    #[test]
    fn test_entry_kind_skips_unreadable_type() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("x.txt"), "x").unwrap();

        let vanished = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(entry_kind(vanished), None);
        assert_eq!(
            entry_kind(fs::metadata(base_path.join("x.txt")).map(|m| m.file_type())),
            Some(EntryKind::File)
        );
        assert_eq!(
            entry_kind(fs::metadata(base_path).map(|m| m.file_type())),
            Some(EntryKind::Dir)
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_read_dir_flags_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join(OsStr::from_bytes(b"scan\xff.pdf")), "x").unwrap();
        fs::write(base_path.join("plain.pdf"), "x").unwrap();

        let entries = OsFileSystem.read_dir(base_path).unwrap();
        assert_eq!(entries.len(), 2);
        let plain = entries.iter().find(|e| e.name == "plain.pdf").unwrap();
        assert!(!plain.lossy);
        let lossy = entries.iter().find(|e| e.name != "plain.pdf").unwrap();
        assert!(lossy.lossy);
        assert!(lossy.name.starts_with("scan"));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".DS_Store"));
        assert!(is_hidden(".hidden"));
        assert!(!is_hidden("visible.txt"));
        assert!(!is_hidden("Thumbs.db"));
    }
}
