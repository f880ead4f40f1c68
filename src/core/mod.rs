pub mod error;
pub mod value;

pub use error::{RecordError, Result};
pub use value::{Fields, Value, fields_from};
