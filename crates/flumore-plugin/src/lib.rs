#![forbid(unsafe_code)]
//! flumore-plugin: reader and writer sessions for the FLUMORE format.
//!
//! Input: `open -> read_schema (negotiation mode only) -> read* -> close`.
//! Output: `open -> write* -> close`. Host services arrive through a
//! [`HostContext`]; per-session state lives in the session objects so any
//! number of readers and writers can coexist.

pub mod error;
pub mod feature;
pub mod host;
pub mod messages;
pub mod reader;
pub mod writer;

pub use error::{PluginError, ProtocolViolation, Result, Status};
pub use feature::{log_feature, Attribute, Feature};
pub use host::{HostContext, MappingFile, NoMappingFile, StaticMappingFile};
pub use messages::PLUGIN_ID;
pub use reader::{FlumoreReader, ReaderSession, SchemaReply, SessionMode};
pub use writer::{FlumoreWriter, SchemaFeature, WriterSession};
