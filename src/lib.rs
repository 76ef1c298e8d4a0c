//! FLUMORE format adapter.
//!
//! Re-exports the workspace crates under one roof:
//! - [`core`]: record model, schema descriptor, configuration, host log
//! - [`geom`]: geometry model and decomposition visitor
//! - [`io`]: dataset sources and the record cursor
//! - [`plugin`]: reader and writer sessions

pub use flumore_core as core;
pub use flumore_geom as geom;
pub use flumore_io as io;
pub use flumore_plugin as plugin;

pub use flumore_plugin::{Feature, FlumoreReader, FlumoreWriter, HostContext, PluginError};
