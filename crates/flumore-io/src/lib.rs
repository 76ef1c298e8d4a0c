#![forbid(unsafe_code)]
//! flumore-io: dataset source adapters and the record cursor.
//!
//! A [`DatasetSource`] materialises the nested simulation table once; the
//! [`DatasetCursor`] loads it lazily on the first `advance` and then hands out
//! one flattened [`flumore_core::Record`] per call.

pub mod cursor;
pub mod error;
pub mod memory_source;
pub mod readers;

pub use cursor::{Cursor, DatasetCursor};
pub use error::{Error, Result};
pub use memory_source::MemorySource;
pub use readers::{source_for, AutoSource, CsvSource, DatasetSource, JsonSource};
