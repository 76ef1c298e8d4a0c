//! RAII guards pairing geometry-tool acquisitions with their release.
//!
//! Both guards hand the resource back in `Drop`, so an early `?` return from
//! the decomposer releases exactly what was taken.

use crate::node::{Coord, GeometryKind, GeometryNode};
use crate::tools::GeometryTools;

/// A geometry owned by the tools for the duration of one scope.
pub struct ScopedGeometry<'a> {
    tools: &'a dyn GeometryTools,
    geometry: GeometryNode,
}

impl<'a> ScopedGeometry<'a> {
    pub fn new(tools: &'a dyn GeometryTools, geometry: GeometryNode) -> Self {
        Self { tools, geometry }
    }

    /// A fresh point from the tools, destroyed when the guard drops.
    pub fn scratch_point(tools: &'a dyn GeometryTools) -> Self {
        let geometry = tools.create_point();
        Self::new(tools, geometry)
    }

    pub fn get(&self) -> &GeometryNode {
        &self.geometry
    }

    /// Overwrite the scratch point's coordinates.
    pub fn set_point(&mut self, at: Coord) {
        match &mut self.geometry {
            GeometryNode::Point(p) => *p = at,
            other => *other = GeometryNode::Point(at),
        }
    }
}

impl Drop for ScopedGeometry<'_> {
    fn drop(&mut self) {
        let geometry = std::mem::take(&mut self.geometry);
        self.tools.destroy_geometry(geometry);
    }
}

/// Part iterator over a composite geometry.
pub struct PartIter<'a> {
    tools: &'a dyn GeometryTools,
    kind: GeometryKind,
}

impl<'a> PartIter<'a> {
    pub fn acquire(tools: &'a dyn GeometryTools, kind: GeometryKind) -> Self {
        tools.acquire_iterator(kind);
        Self { tools, kind }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }
}

impl Drop for PartIter<'_> {
    fn drop(&mut self) {
        self.tools.release_iterator(self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::StandardGeometryTools;

    #[test]
    fn guards_release_on_drop() {
        let tools = StandardGeometryTools::new();
        {
            let mut p = ScopedGeometry::scratch_point(&tools);
            p.set_point(Coord::new(3.0, 4.0));
            assert_eq!(p.get(), &GeometryNode::point(3.0, 4.0));
            let it = PartIter::acquire(&tools, GeometryKind::MultiPoint);
            assert_eq!(it.kind(), GeometryKind::MultiPoint);
            assert_eq!(tools.ledger().outstanding(), 2);
        }
        assert!(tools.ledger().snapshot().is_balanced());
    }

    #[test]
    fn guard_releases_during_unwind() {
        let tools = StandardGeometryTools::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _p = ScopedGeometry::scratch_point(&tools);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(tools.ledger().snapshot().is_balanced());
    }
}
