#![forbid(unsafe_code)]
//! flumore-core: record model, schema descriptor, configuration and host log
//! abstraction shared by every FLUMORE adapter crate.
//!
//! No IO and no geometry live here.

pub mod config;
pub mod error;
pub mod log;
pub mod prelude;
pub mod schema;
pub mod types;

pub use config::{AdapterConfig, SourceFormat};
pub use error::{Error, Result};
pub use log::{LogSink, RecordingLogSink, Severity, TracingLogSink};
pub use schema::SchemaDescriptor;
pub use types::{AttributeValue, Dataset, Group, Record, Row, Timestamp};
