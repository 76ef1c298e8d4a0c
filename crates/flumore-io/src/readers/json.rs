//! JSON dataset adapter.
//!
//! Expected shape: an array of groups,
//! `[{"timestamp": "...", "rows": [{"id": 1, "h": .., "vres": .., "wsp": .., "x": .., "y": .., "z": ..}]}]`.

use std::fs::File;
use std::io::{BufReader, Read};

use flumore_core::types::Dataset;

use crate::error::Result;
use crate::readers::DatasetSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSource;

impl JsonSource {
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn parse_str(text: &str) -> Result<Dataset> {
        Ok(serde_json::from_str(text)?)
    }
}

impl DatasetSource for JsonSource {
    fn load(&self, path: &str) -> Result<Dataset> {
        let file = File::open(path)?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(
            path,
            groups = dataset.len(),
            rows = dataset.total_rows(),
            "loaded json dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_groups_and_defaults_missing_rows() {
        let ds = JsonSource::parse_str(
            r#"[{"timestamp":"t0","rows":[{"id":1,"h":1.5,"vres":0.1,"wsp":2.0,"x":1,"y":2,"z":3}]},{"timestamp":"t1"}]"#,
        )
        .unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.total_rows(), 1);
        assert!(ds.groups()[1].is_empty());
    }

    #[test]
    fn rejects_malformed_rows() {
        assert!(JsonSource::parse_str(r#"[{"timestamp":"t0","rows":[{"id":"x"}]}]"#).is_err());
    }
}
