use super::Store;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded write: where it went and what was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub location: PathBuf,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<PathBuf, Vec<u8>>,
    writes: Vec<WriteRecord>,
    reads: usize,
    fail_writes: bool,
    fail_reads: bool,
}

/// In-memory store.
///
/// Cloning yields another handle onto the same contents, so a test can keep
/// one handle while a record owns the other, and two records can share a
/// location. Every write is logged.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|err| io::Error::other(format!("Memory store lock poisoned: {}", err)))
    }

    /// Seed contents without counting it as a write.
    pub fn insert<P: Into<PathBuf>>(&self, location: P, bytes: impl Into<Vec<u8>>) -> io::Result<()> {
        self.lock()?.entries.insert(location.into(), bytes.into());
        Ok(())
    }

    /// Current contents at `location`
    pub fn contents<P: AsRef<Path>>(&self, location: P) -> io::Result<Option<Vec<u8>>> {
        Ok(self.lock()?.entries.get(location.as_ref()).cloned())
    }

    /// Remove whatever is stored at `location`
    pub fn remove<P: AsRef<Path>>(&self, location: P) -> io::Result<Option<Vec<u8>>> {
        Ok(self.lock()?.entries.remove(location.as_ref()))
    }

    /// Every successful write so far, oldest first
    pub fn writes(&self) -> io::Result<Vec<WriteRecord>> {
        Ok(self.lock()?.writes.clone())
    }

    /// Number of successful writes across all locations
    pub fn write_count(&self) -> io::Result<usize> {
        Ok(self.lock()?.writes.len())
    }

    /// Number of read calls, including not-found reads
    pub fn read_count(&self) -> io::Result<usize> {
        Ok(self.lock()?.reads)
    }

    /// Make subsequent writes fail with an I/O error
    pub fn fail_writes(&self, fail: bool) -> io::Result<()> {
        self.lock()?.fail_writes = fail;
        Ok(())
    }

    /// Make subsequent reads fail with an I/O error
    pub fn fail_reads(&self, fail: bool) -> io::Result<()> {
        self.lock()?.fail_reads = fail;
        Ok(())
    }
}

impl Store for MemoryStore {
    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(io::Error::other(format!(
                "Injected write failure for '{}'",
                location.display()
            )));
        }
        state.entries.insert(location.to_path_buf(), bytes.to_vec());
        state.writes.push(WriteRecord {
            location: location.to_path_buf(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn read(&self, location: &Path) -> io::Result<Option<Vec<u8>>> {
        let mut state = self.lock()?;
        state.reads += 1;
        if state.fail_reads {
            return Err(io::Error::other(format!(
                "Injected read failure for '{}'",
                location.display()
            )));
        }
        Ok(state.entries.get(location).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_contents() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.write(Path::new("/r"), b"abc").unwrap();

        assert_eq!(other.contents("/r").unwrap().unwrap(), b"abc");
        assert_eq!(other.write_count().unwrap(), 1);
    }

    #[test]
    fn test_insert_is_not_a_write() {
        let store = MemoryStore::new();
        store.insert("/r", b"seed".to_vec()).unwrap();

        assert_eq!(store.write_count().unwrap(), 0);
        assert_eq!(store.read(Path::new("/r")).unwrap().unwrap(), b"seed");
        assert_eq!(store.read_count().unwrap(), 1);
    }

    #[test]
    fn test_injected_failures() {
        let store = MemoryStore::new();
        store.fail_writes(true).unwrap();
        assert!(store.write(Path::new("/r"), b"x").is_err());
        assert_eq!(store.write_count().unwrap(), 0);
        assert!(store.contents("/r").unwrap().is_none());

        store.fail_reads(true).unwrap();
        assert!(store.read(Path::new("/r")).is_err());
    }

    #[test]
    fn test_missing_location_reads_none() {
        let store = MemoryStore::new();
        assert!(store.read(Path::new("/missing")).unwrap().is_none());
        store.insert("/r", b"x".to_vec()).unwrap();
        assert!(store.remove("/r").unwrap().is_some());
        assert!(store.read(Path::new("/r")).unwrap().is_none());
    }

    #[test]
    fn test_poisoned_lock_is_an_error_everywhere() {
        let store = MemoryStore::new();
        let shared = store.clone();
        let _ = thread::spawn(move || {
            let _guard = shared.state.lock().unwrap();
            panic!("poison the store");
        })
        .join();

        assert!(store.write(Path::new("/r"), b"x").is_err());
        assert!(store.read(Path::new("/r")).is_err());
        assert!(store.insert("/r", b"x".to_vec()).is_err());
        assert!(store.contents("/r").is_err());
        assert!(store.write_count().is_err());
        assert!(store.fail_writes(false).is_err());
    }
}
