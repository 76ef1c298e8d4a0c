//! Dataset source adapters.
//!
//! A source turns a dataset name into a fully materialised [`Dataset`]. The
//! cursor calls `load` at most once per session.

pub mod csv;
pub mod json;

use std::path::Path;
use std::sync::Arc;

use flumore_core::config::SourceFormat;
use flumore_core::types::Dataset;

use crate::error::{Error, Result};

pub use self::csv::CsvSource;
pub use self::json::JsonSource;

pub trait DatasetSource: Send + Sync {
    fn load(&self, path: &str) -> Result<Dataset>;
}

/// Picks the JSON or CSV adapter from the configured format, or from the
/// file extension when the format is `Auto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSource {
    format: SourceFormat,
}

impl AutoSource {
    pub fn new(format: SourceFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    fn resolve(&self, path: &str) -> Result<SourceFormat> {
        match self.format {
            SourceFormat::Auto => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase());
                match ext.as_deref() {
                    Some("json") => Ok(SourceFormat::Json),
                    Some("csv") => Ok(SourceFormat::Csv),
                    Some(other) => Err(Error::UnsupportedFormat(format!(".{other}"))),
                    None => Err(Error::UnsupportedFormat(format!(
                        "no extension on '{path}'"
                    ))),
                }
            }
            fixed => Ok(fixed),
        }
    }
}

impl DatasetSource for AutoSource {
    fn load(&self, path: &str) -> Result<Dataset> {
        match self.resolve(path)? {
            SourceFormat::Json => JsonSource.load(path),
            SourceFormat::Csv => CsvSource.load(path),
            SourceFormat::Auto => Err(Error::UnsupportedFormat(path.to_string())),
        }
    }
}

/// Shared source handle for a configured format.
pub fn source_for(format: SourceFormat) -> Arc<dyn DatasetSource> {
    match format {
        SourceFormat::Json => Arc::new(JsonSource),
        SourceFormat::Csv => Arc::new(CsvSource),
        SourceFormat::Auto => Arc::new(AutoSource::new(SourceFormat::Auto)),
    }
}
