// ============================================================================
// pstruct Library
// ============================================================================

//! Dynamically-shaped records that write themselves through to a store.
//!
//! A [`PersistentRecord`] is an ordered bag of named fields bound to a
//! location. Every `set` or `delete` encodes the whole field set with a
//! [`Codec`] and hands it to a [`Store`] before returning; reads and
//! construction never write.
//!
//! ```no_run
//! use pstruct::{PersistentRecord, fields_from};
//!
//! # fn main() -> pstruct::Result<()> {
//! let mut record = PersistentRecord::with_fields("/tmp/ps.json", fields_from([("foo", "bar")]))?;
//! record.commit()?;                  // {"foo":"bar"}
//! record.set("baz", 42)?;            // {"foo":"bar","baz":42}
//! record.delete("foo")?;             // {"baz":42}
//!
//! let loaded = PersistentRecord::open("/tmp/ps.json")?;
//! assert_eq!(loaded["baz"], 42);
//! # Ok(())
//! # }
//! ```
//!
//! Records pointing at the same location are not coordinated in any way:
//! whichever writes last wins, and the others keep their own view in memory.

pub mod codec;
pub mod core;
pub mod record;
pub mod storage;

// Re-export main types for convenience
pub use crate::codec::{Codec, CodecError, Format, JsonCodec, MessagePackCodec, YamlCodec};
pub use crate::core::{Fields, RecordError, Result, Value, fields_from};
pub use crate::record::{PersistentRecord, RecordBuilder};
pub use crate::storage::{DurabilityMode, FileStore, FileStoreConfig, MemoryStore, Store, WriteRecord};
