use super::PersistentRecord;
use crate::codec::{Codec, JsonCodec};
use crate::core::{Fields, RecordError, Result, Value};
use crate::storage::{FileStore, Store};
use std::path::PathBuf;

/// Step-by-step construction of a [`PersistentRecord`].
///
/// # Examples
///
/// ```
/// use pstruct::{MemoryStore, PersistentRecord, YamlCodec};
///
/// # fn main() -> pstruct::Result<()> {
/// let record = PersistentRecord::builder()
///     .location("/tmp/settings.yml")
///     .field("theme", "dark")
///     .codec(YamlCodec)
///     .store(MemoryStore::new())
///     .build()?;
/// assert_eq!(record["theme"], "dark");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder<C = JsonCodec, S = FileStore> {
    location: Option<PathBuf>,
    fields: Fields,
    codec: C,
    store: S,
}

impl RecordBuilder<JsonCodec, FileStore> {
    pub fn new() -> Self {
        Self {
            location: None,
            fields: Fields::new(),
            codec: JsonCodec::default(),
            store: FileStore::new(),
        }
    }
}

impl Default for RecordBuilder<JsonCodec, FileStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> RecordBuilder<C, S> {
    /// Set the backing location (required)
    pub fn location<P: Into<PathBuf>>(mut self, location: P) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Replace the initial fields
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Add one initial field
    pub fn field<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Use another codec
    pub fn codec<C2>(self, codec: C2) -> RecordBuilder<C2, S> {
        RecordBuilder {
            location: self.location,
            fields: self.fields,
            codec,
            store: self.store,
        }
    }

    /// Use another store
    pub fn store<S2>(self, store: S2) -> RecordBuilder<C, S2> {
        RecordBuilder {
            location: self.location,
            fields: self.fields,
            codec: self.codec,
            store,
        }
    }
}

impl<C: Codec, S: Store> RecordBuilder<C, S> {
    /// Build the record without touching the store.
    pub fn build(self) -> Result<PersistentRecord<C, S>> {
        let location = self.location.ok_or_else(|| {
            RecordError::InvalidArgument("record location is required".to_string())
        })?;
        PersistentRecord::with_parts(location, self.fields, self.codec, self.store)
    }

    /// Build the record and load it from the store.
    ///
    /// Any initial fields are replaced by the loaded ones.
    pub fn open(self) -> Result<PersistentRecord<C, S>> {
        let mut record = self.build()?;
        record.load()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_build_without_location_fails() {
        let err = RecordBuilder::new().field("a", 1).build().unwrap_err();
        assert!(matches!(err, RecordError::InvalidArgument(_)));
    }

    #[test]
    fn test_build_does_not_touch_store() {
        let store = MemoryStore::new();
        let record = RecordBuilder::new()
            .location("/r")
            .field("a", 1)
            .field("b", "two")
            .store(store.clone())
            .build()
            .unwrap();

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store.write_count().unwrap(), 0);
        assert_eq!(store.read_count().unwrap(), 0);
    }

    #[test]
    fn test_open_replaces_initial_fields() {
        let store = MemoryStore::new();
        store.insert("/r", br#"{"loaded":true}"#.to_vec()).unwrap();

        let record = RecordBuilder::new()
            .location("/r")
            .field("seed", 1)
            .store(store.clone())
            .open()
            .unwrap();

        assert_eq!(record.get("loaded"), Some(&json!(true)));
        assert!(!record.contains("seed"));
        assert_eq!(store.read_count().unwrap(), 1);
    }
}
