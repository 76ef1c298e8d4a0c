//! Ordered record of the primitive visits a decomposition produced.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::GeometryKind;

/// Position a visited node held relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartRole {
    Root,
    Part,
    Segment,
    Boundary,
    OuterBoundary,
    InnerBoundary,
    Location,
    CenterPoint,
    StartPoint,
    MidPoint,
    EndPoint,
    Area,
    Base,
    OuterSurface,
    InnerSurface,
    CsgEquivalent,
}

impl PartRole {
    pub fn name(&self) -> &'static str {
        match self {
            PartRole::Root => "root",
            PartRole::Part => "part",
            PartRole::Segment => "segment",
            PartRole::Boundary => "boundary",
            PartRole::OuterBoundary => "outer boundary",
            PartRole::InnerBoundary => "inner boundary",
            PartRole::Location => "location",
            PartRole::CenterPoint => "center point",
            PartRole::StartPoint => "start point",
            PartRole::MidPoint => "mid point",
            PartRole::EndPoint => "end point",
            PartRole::Area => "area",
            PartRole::Base => "base",
            PartRole::OuterSurface => "outer surface",
            PartRole::InnerSurface => "inner surface",
            PartRole::CsgEquivalent => "csg equivalent",
        }
    }
}

impl fmt::Display for PartRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub kind: GeometryKind,
    pub role: PartRole,
    pub depth: usize,
}

/// Post-order visit log: a node's entry follows all of its children's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Visited kinds in order.
    pub fn kinds(&self) -> Vec<GeometryKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
