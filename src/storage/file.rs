//! File-system store: every write atomically replaces the whole file.

use super::Store;
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

// ============================================================================
// Durability Configuration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// fsync the new contents before they replace the old file
    Sync,
    /// leave flushing to the OS
    #[default]
    Async,
}

/// File store configuration
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Whether writes are synced to disk before the rename
    pub durability: DurabilityMode,

    /// Create missing parent directories on write
    pub create_dirs: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            durability: DurabilityMode::default(),
            create_dirs: true,
        }
    }
}

impl FileStoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the durability mode
    pub fn durability(mut self, durability: DurabilityMode) -> Self {
        self.durability = durability;
        self
    }

    /// Set whether missing parent directories are created
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

// ============================================================================
// File Store
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct FileStore {
    config: FileStoreConfig,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FileStoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FileStoreConfig {
        &self.config
    }
}

impl Store for FileStore {
    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()> {
        // Write through symlinks to the file they point at.
        let target = match fs::canonicalize(location) {
            Ok(resolved) => resolved,
            Err(err) if err.kind() == io::ErrorKind::NotFound => location.to_path_buf(),
            Err(err) => return Err(err),
        };
        let permissions = match fs::metadata(&target) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };

        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if self.config.create_dirs {
            fs::create_dir_all(parent)?;
        }

        // Temp file lives next to the target so the rename stays on one file system.
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(bytes)?;
        temp.flush()?;
        if let Some(permissions) = permissions {
            temp.as_file().set_permissions(permissions)?;
        }
        if self.config.durability == DurabilityMode::Sync {
            temp.as_file().sync_all()?;
        }
        temp.persist(&target).map_err(|err| err.error)?;

        debug!("Wrote {} bytes to '{}'", bytes.len(), target.display());
        Ok(())
    }

    fn read(&self, location: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(location) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new();
        assert!(store.read(&temp_dir.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn test_write_replaces_full_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rec.json");
        let store = FileStore::new();

        store.write(&path, b"a much longer first version").unwrap();
        store.write(&path, b"short").unwrap();

        assert_eq!(store.read(&path).unwrap().unwrap(), b"short");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("rec.json");
        let store = FileStore::with_config(FileStoreConfig::new().durability(DurabilityMode::Sync));

        store.write(&path, b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_without_create_dirs_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("rec.json");
        let store = FileStore::with_config(FileStoreConfig::new().create_dirs(false));

        assert!(store.write(&path, b"{}").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rec.json");
        let store = FileStore::new();
        store.write(&path, b"1").unwrap();
        store.write(&path, b"2").unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_read_directory_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new();
        assert!(store.read(temp_dir.path()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rec.json");
        fs::write(&path, b"{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileStore::new().write(&path, br#"{"a":1}"#).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(fs::read(&path).unwrap(), br#"{"a":1}"#);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_goes_through_symlink() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real.json");
        let link = temp_dir.path().join("link.json");
        fs::write(&real, b"{}").unwrap();
        symlink(&real, &link).unwrap();

        let store = FileStore::new();
        store.write(&link, br#"{"b":2}"#).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&real).unwrap(), br#"{"b":2}"#);
        assert_eq!(store.read(&link).unwrap().unwrap(), br#"{"b":2}"#);
    }
}
