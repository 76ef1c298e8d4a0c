//! Convenient re-exports for downstream crates.

pub use crate::config::{AdapterConfig, SourceFormat};
pub use crate::error::{Error, Result};
pub use crate::log::{LogSink, RecordingLogSink, Severity, TracingLogSink};
pub use crate::schema::{
    DataType, Field, SchemaDescriptor, ATTRIBUTE_NAMES, FEATURE_TYPE, GEOMETRY_ATTRIBUTE,
    GEOMETRY_NONE,
};
pub use crate::types::{AttributeValue, Dataset, Group, Record, Row, Timestamp};
