//! Lazy two-level cursor over a nested dataset.

use std::sync::Arc;

use tracing::{debug, trace};

use flumore_core::types::{Dataset, Record};

use crate::error::{Error, Result};
use crate::readers::DatasetSource;

/// Position of the next row to hand out.
///
/// While `outer < groups.len()`, `inner < groups[outer].rows.len()`; once
/// `outer == groups.len()` the stream is exhausted for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub outer: usize,
    pub inner: usize,
}

impl Cursor {
    pub fn is_exhausted(&self, dataset: &Dataset) -> bool {
        self.outer >= dataset.len()
    }

    /// Move past empty groups so the `inner` bound holds again.
    fn settle(&mut self, dataset: &Dataset) {
        while let Some(group) = dataset.group(self.outer) {
            if self.inner < group.len() {
                break;
            }
            self.outer += 1;
            self.inner = 0;
        }
    }

    /// Record at the current position, then step forward.
    fn step(&mut self, dataset: &Dataset) -> Option<Record> {
        self.settle(dataset);
        let group = dataset.group(self.outer)?;
        let row = *group.rows.get(self.inner)?;
        let record = Record::new(row, group.timestamp.clone());
        self.inner += 1;
        self.settle(dataset);
        Some(record)
    }
}

#[derive(Debug)]
enum LoadState {
    Pending,
    Loaded(Dataset),
    Failed(String),
}

/// Session-scoped record stream. The dataset is loaded on the first
/// `advance`; a failed load is never retried.
pub struct DatasetCursor {
    source: Arc<dyn DatasetSource>,
    path: String,
    state: LoadState,
    position: Cursor,
    emitted: u64,
}

impl DatasetCursor {
    pub fn new(source: Arc<dyn DatasetSource>, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
            state: LoadState::Pending,
            position: Cursor::default(),
            emitted: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn position(&self) -> Cursor {
        self.position
    }

    pub fn records_emitted(&self) -> u64 {
        self.emitted
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, LoadState::Failed(_))
    }

    /// Next flattened record, or `None` at end of stream.
    pub fn advance(&mut self) -> Result<Option<Record>> {
        if let LoadState::Pending = self.state {
            self.load()?;
        }
        match &self.state {
            LoadState::Loaded(dataset) => {
                let record = self.position.step(dataset);
                match &record {
                    Some(rec) => {
                        self.emitted += 1;
                        trace!(id = rec.row.id, date = %rec.timestamp, "record");
                    }
                    None => trace!(emitted = self.emitted, "end of stream"),
                }
                Ok(record)
            }
            LoadState::Failed(reason) => Err(Error::Load {
                path: self.path.clone(),
                reason: reason.clone(),
            }),
            LoadState::Pending => Err(Error::Load {
                path: self.path.clone(),
                reason: "dataset not loaded".to_string(),
            }),
        }
    }

    fn load(&mut self) -> Result<()> {
        match self.source.load(&self.path) {
            Ok(dataset) => {
                debug!(
                    path = %self.path,
                    groups = dataset.len(),
                    rows = dataset.total_rows(),
                    "dataset loaded"
                );
                self.state = LoadState::Loaded(dataset);
                Ok(())
            }
            Err(e) => {
                let err = e.into_load(&self.path);
                let reason = match &err {
                    Error::Load { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                debug!(path = %self.path, %reason, "dataset load failed");
                self.state = LoadState::Failed(reason);
                Err(err)
            }
        }
    }
}
