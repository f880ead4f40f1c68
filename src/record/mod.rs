//! Records whose fields are written through to a store on every mutation.

mod builder;

pub use builder::RecordBuilder;

use crate::codec::{Codec, JsonCodec};
use crate::core::value::{NULL, render};
use crate::core::{Fields, RecordError, Result, Value};
use crate::storage::{FileStore, Store};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};

/// An ordered bag of named fields bound to a storage location.
///
/// Setting or deleting a field encodes the whole field set and writes it to
/// the location before the call returns. Reads never touch the store, and
/// neither does construction: a record seeded with initial fields stays
/// unwritten until the first mutation or an explicit [`commit`](Self::commit).
///
/// If a write fails the in-memory change is kept, so memory is ahead of the
/// store until the next successful write.
///
/// # Examples
///
/// ```
/// use pstruct::{JsonCodec, MemoryStore, PersistentRecord, fields_from};
///
/// # fn main() -> pstruct::Result<()> {
/// let store = MemoryStore::new();
/// let mut record = PersistentRecord::with_parts(
///     "/tmp/r",
///     fields_from([("foo", "bar")]),
///     JsonCodec::default(),
///     store.clone(),
/// )?;
/// assert_eq!(store.write_count().unwrap(), 0);
///
/// record.set("baz", 42)?;
/// assert_eq!(store.contents("/tmp/r").unwrap().unwrap(), br#"{"foo":"bar","baz":42}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PersistentRecord<C = JsonCodec, S = FileStore> {
    location: PathBuf,
    fields: Fields,
    codec: C,
    store: S,
}

impl PersistentRecord<JsonCodec, FileStore> {
    /// Create an empty record backed by a JSON file. Nothing is written.
    pub fn new<P: Into<PathBuf>>(location: P) -> Result<Self> {
        Self::with_parts(location, Fields::new(), JsonCodec::default(), FileStore::new())
    }

    /// Create a record backed by a JSON file, seeded with `fields`. Nothing is written.
    pub fn with_fields<P: Into<PathBuf>>(location: P, fields: Fields) -> Result<Self> {
        Self::with_parts(location, fields, JsonCodec::default(), FileStore::new())
    }

    /// Create a record backed by a JSON file and load it.
    ///
    /// A file that does not exist yet loads as an empty record.
    pub fn open<P: Into<PathBuf>>(location: P) -> Result<Self> {
        Self::open_with(location, JsonCodec::default(), FileStore::new())
    }

    pub fn builder() -> RecordBuilder {
        RecordBuilder::new()
    }
}

impl<C: Codec, S: Store> PersistentRecord<C, S> {
    /// Create a record with explicit collaborators. Nothing is written.
    ///
    /// Fails with [`RecordError::InvalidArgument`] if `location` is empty.
    pub fn with_parts<P: Into<PathBuf>>(location: P, fields: Fields, codec: C, store: S) -> Result<Self> {
        let location = validate_location(location.into())?;
        Ok(Self {
            location,
            fields,
            codec,
            store,
        })
    }

    /// Create an empty record with explicit collaborators, then [`load`](Self::load) it.
    pub fn open_with<P: Into<PathBuf>>(location: P, codec: C, store: S) -> Result<Self> {
        let mut record = Self::with_parts(location, Fields::new(), codec, store)?;
        record.load()?;
        Ok(record)
    }

    // ========================================================================
    // Location
    // ========================================================================

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Point the record at another location. Nothing is written.
    pub fn set_location<P: Into<PathBuf>>(&mut self, location: P) -> Result<()> {
        self.location = validate_location(location.into())?;
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current value of `name`, or `None` if the field is unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Deserialize a field into `T`. `Ok(None)` if the field is unset.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|err| RecordError::TypeMismatch {
                    field: name.to_string(),
                    message: err.to_string(),
                }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Mutations (write-through)
    // ========================================================================

    /// Insert or overwrite `name`, then persist the whole record.
    ///
    /// Returns the stored value. On a persistence error the field keeps its
    /// new value in memory.
    pub fn set<K, V>(&mut self, name: K, value: V) -> Result<&Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let name = name.into();
        self.fields.insert(name.clone(), value.into());
        self.write_through("set", &name)?;
        Ok(self.fields.get(&name).unwrap_or(&NULL))
    }

    /// Remove `name` if present, then persist the whole record.
    ///
    /// Deleting an unset field is not an error and still persists.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.fields.shift_remove(name);
        self.write_through("delete", name)
    }

    fn write_through(&self, op: &str, name: &str) -> Result<()> {
        self.commit().inspect_err(|err| {
            warn!(
                "Write-through after {} of '{}' failed; '{}' is behind memory: {}",
                op,
                name,
                self.location.display(),
                err
            );
        })
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replace the fields with whatever is stored at the location.
    ///
    /// Missing or empty contents load as an empty record. Returns the newly
    /// loaded fields.
    pub fn load(&mut self) -> Result<&Fields> {
        let bytes = self
            .store
            .read(&self.location)
            .map_err(|source| RecordError::StoreReadFailure {
                location: self.location.clone(),
                source,
            })?;

        let fields = match bytes {
            Some(bytes) => self
                .codec
                .decode(&bytes)
                .map_err(|source| RecordError::DecodeFailure {
                    location: self.location.clone(),
                    source,
                })?,
            None => {
                debug!("No record at '{}', loading empty", self.location.display());
                Fields::new()
            }
        };

        debug!(
            "Loaded {} fields from '{}'",
            fields.len(),
            self.location.display()
        );
        self.fields = fields;
        Ok(&self.fields)
    }

    /// Encode every field and replace the stored contents with the result.
    pub fn commit(&self) -> Result<()> {
        let bytes = self
            .codec
            .encode(&self.fields)
            .map_err(RecordError::EncodeFailure)?;

        self.store
            .write(&self.location, &bytes)
            .map_err(|source| RecordError::PersistenceFailure {
                location: self.location.clone(),
                source,
            })?;

        debug!(
            "Committed {} fields ({} bytes) to '{}'",
            self.fields.len(),
            bytes.len(),
            self.location.display()
        );
        Ok(())
    }
}

fn validate_location(location: PathBuf) -> Result<PathBuf> {
    if location.as_os_str().is_empty() {
        return Err(RecordError::InvalidArgument(
            "record location is required".to_string(),
        ));
    }
    Ok(location)
}

impl<C, S> Index<&str> for PersistentRecord<C, S> {
    type Output = Value;

    /// Unset fields index as `Value::Null`.
    fn index(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&NULL)
    }
}

impl<C, S> fmt::Display for PersistentRecord<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<PersistentRecord {}", self.location.display())?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}={}", sep, name, render(value))?;
        }
        write!(f, ">")
    }
}
