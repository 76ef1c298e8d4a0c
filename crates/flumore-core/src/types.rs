//! Simulation dataset model and the flattened record view handed to hosts.
//!
//! A dataset is a nested table: an ordered list of timestamped groups, each
//! holding an ordered list of rows. Readers flatten it into one `Record` per
//! row; nothing here knows about cursors or sources.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{DataType, FEATURE_TYPE};

/// Timestamp of a group, kept as the text the source supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One row of a simulation timestep.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub id: i32,
    pub h: f64,
    pub vres: f64,
    pub wsp: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A timestamped batch of rows (one simulation timestep).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub timestamp: Timestamp,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Group {
    pub fn new(timestamp: impl Into<Timestamp>, rows: Vec<Row>) -> Self {
        Self {
            timestamp: timestamp.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The full nested table as loaded from a source. Immutable after load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    groups: Vec<Group>,
}

impl Dataset {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, idx: usize) -> Option<&Group> {
        self.groups.get(idx)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of rows across all groups.
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

impl From<Vec<Group>> for Dataset {
    fn from(groups: Vec<Group>) -> Self {
        Self::new(groups)
    }
}

/// A typed attribute value as carried on a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    I32(i32),
    F64(f64),
    Str(String),
}

impl AttributeValue {
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::I32(_) => Some(DataType::Int32),
            AttributeValue::F64(_) => Some(DataType::Float64),
            AttributeValue::Str(_) => Some(DataType::Utf8),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::I32(i) => Some(f64::from(*i)),
            AttributeValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "<null>"),
            AttributeValue::I32(i) => write!(f, "{i}"),
            AttributeValue::F64(v) => write!(f, "{v}"),
            AttributeValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Flattened view of one row plus its group's timestamp.
///
/// Produced by the cursor and consumed immediately by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub row: Row,
    pub timestamp: Timestamp,
    pub feature_type: String,
}

impl Record {
    pub fn new(row: Row, timestamp: Timestamp) -> Self {
        Self {
            row,
            timestamp,
            feature_type: FEATURE_TYPE.to_string(),
        }
    }

    /// Attribute name/value pairs in schema order (`id,h,vres,wsp,x,y,z,date`).
    pub fn attributes(&self) -> Vec<(&'static str, AttributeValue)> {
        let r = &self.row;
        vec![
            ("id", AttributeValue::I32(r.id)),
            ("h", AttributeValue::F64(r.h)),
            ("vres", AttributeValue::F64(r.vres)),
            ("wsp", AttributeValue::F64(r.wsp)),
            ("x", AttributeValue::F64(r.x)),
            ("y", AttributeValue::F64(r.y)),
            ("z", AttributeValue::F64(r.z)),
            ("date", AttributeValue::Str(self.timestamp.to_string())),
        ]
    }
}
