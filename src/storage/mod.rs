pub mod engine;
pub mod file;
pub mod memory;

pub use engine::Store;
pub use file::{DurabilityMode, FileStore, FileStoreConfig};
pub use memory::{MemoryStore, WriteRecord};
