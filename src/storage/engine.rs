use std::io;
use std::path::Path;

/// Byte sink backing a record's location - allows pluggable storage backends.
///
/// Methods take `&self`; implementations that keep state use interior
/// mutability. Nothing coordinates two writers targeting the same location:
/// the last write wins.
pub trait Store: Send + Sync {
    /// Replace the full contents at `location` with `bytes`.
    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Read the full contents at `location`.
    ///
    /// Returns `Ok(None)` when nothing has been stored there yet.
    fn read(&self, location: &Path) -> io::Result<Option<Vec<u8>>>;
}

impl<S: Store + ?Sized> Store for &S {
    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()> {
        (**self).write(location, bytes)
    }

    fn read(&self, location: &Path) -> io::Result<Option<Vec<u8>>> {
        (**self).read(location)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()> {
        (**self).write(location, bytes)
    }

    fn read(&self, location: &Path) -> io::Result<Option<Vec<u8>>> {
        (**self).read(location)
    }
}
