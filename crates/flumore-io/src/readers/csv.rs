//! CSV dataset adapter.
//!
//! Columns: `date,id,h,vres,wsp,x,y,z`. Consecutive rows sharing a `date`
//! form one group; a date that reappears later starts a new group.

use std::fs::File;
use std::io::Read;

use serde::Deserialize;

use flumore_core::types::{Dataset, Group, Row, Timestamp};

use crate::error::Result;
use crate::readers::DatasetSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSource;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    id: i32,
    h: f64,
    vres: f64,
    wsp: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl CsvSource {
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut groups: Vec<Group> = Vec::new();
        for rec in rdr.deserialize::<CsvRecord>() {
            let rec = rec?;
            let row = Row {
                id: rec.id,
                h: rec.h,
                vres: rec.vres,
                wsp: rec.wsp,
                x: rec.x,
                y: rec.y,
                z: rec.z,
            };
            match groups.last_mut() {
                Some(g) if g.timestamp.as_str() == rec.date => g.rows.push(row),
                _ => groups.push(Group::new(Timestamp::new(rec.date), vec![row])),
            }
        }
        Ok(Dataset::new(groups))
    }
}

impl DatasetSource for CsvSource {
    fn load(&self, path: &str) -> Result<Dataset> {
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        tracing::debug!(
            path,
            groups = dataset.len(),
            rows = dataset.total_rows(),
            "loaded csv dataset"
        );
        Ok(dataset)
    }
}
