//! In-memory dataset source for tests and embedding hosts.
//!
//! Counts `load` calls so callers can check a session loaded exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flumore_core::types::Dataset;

use crate::error::{Error, Result};
use crate::readers::DatasetSource;

/// Clones share the load counter.
#[derive(Debug, Clone)]
pub struct MemorySource {
    outcome: std::result::Result<Dataset, String>,
    loads: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            outcome: Ok(dataset),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose every load fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `load` calls seen so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Acquire)
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new(Dataset::default())
    }
}

impl DatasetSource for MemorySource {
    fn load(&self, path: &str) -> Result<Dataset> {
        self.loads.fetch_add(1, Ordering::AcqRel);
        match &self.outcome {
            Ok(ds) => Ok(ds.clone()),
            Err(reason) => Err(Error::Load {
                path: path.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}
