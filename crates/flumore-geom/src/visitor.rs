//! Depth-first geometry decomposition.
//!
//! One `decompose` call is one pass over a geometry tree. Children are
//! visited before the parent records its own entry, and the first failing
//! node aborts the pass with nothing recorded for it or its ancestors.

use tracing::{debug, trace};

use flumore_core::config::AdapterConfig;

use crate::error::{DecompositionError, Result};
use crate::guard::{PartIter, ScopedGeometry};
use crate::node::{ArcNode, ArcRepresentation, Coord, GeometryKind, GeometryNode};
use crate::trace::{PartRole, Trace, TraceEntry};
use crate::tools::GeometryTools;

pub struct Decomposer<'a> {
    tools: &'a dyn GeometryTools,
    max_depth: usize,
}

impl<'a> Decomposer<'a> {
    pub fn new(tools: &'a dyn GeometryTools, max_depth: usize) -> Self {
        Self { tools, max_depth }
    }

    pub fn with_config(tools: &'a dyn GeometryTools, config: &AdapterConfig) -> Self {
        Self::new(tools, config.max_geometry_depth)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decompose `node`, appending its visits to `trace`.
    ///
    /// On failure the entries already appended stay in `trace`.
    pub fn decompose(&self, node: &GeometryNode, trace: &mut Trace) -> Result<()> {
        self.visit(node, PartRole::Root, 0, trace)
    }

    fn visit(
        &self,
        node: &GeometryNode,
        role: PartRole,
        depth: usize,
        trace: &mut Trace,
    ) -> Result<()> {
        if depth > self.max_depth {
            return Err(DecompositionError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        let kind = node.kind();
        trace!(kind = kind.name(), %role, depth, "start visiting");

        let child = depth + 1;
        match node {
            GeometryNode::Point(_)
            | GeometryNode::Line { .. }
            | GeometryNode::Null
            | GeometryNode::Raster { .. }
            | GeometryNode::TriangleStrip { .. }
            | GeometryNode::TriangleFan { .. }
            | GeometryNode::Box { .. }
            | GeometryNode::RectangleFace { .. }
            | GeometryNode::Mesh { .. }
            | GeometryNode::PointCloud { .. }
            | GeometryNode::FeatureTable { .. } => {}

            GeometryNode::Aggregate { parts }
            | GeometryNode::MultiPoint { parts }
            | GeometryNode::MultiCurve { parts }
            | GeometryNode::MultiArea { parts }
            | GeometryNode::MultiText { parts }
            | GeometryNode::MultiSurface { parts }
            | GeometryNode::MultiSolid { parts }
            | GeometryNode::CompositeSurface { parts }
            | GeometryNode::CompositeSolid { parts } => {
                self.visit_parts(kind, parts, PartRole::Part, child, trace)?;
            }
            GeometryNode::Path { segments } => {
                self.visit_parts(kind, segments, PartRole::Segment, child, trace)?;
            }

            GeometryNode::Arc(arc) => self.visit_arc(arc, child, trace)?,

            GeometryNode::Polygon { boundary } => {
                let boundary = required(boundary, kind, PartRole::Boundary)?;
                self.visit(boundary, PartRole::Boundary, child, trace)?;
            }
            GeometryNode::Donut { outer, inner } => {
                let outer = required(outer, kind, PartRole::OuterBoundary)?;
                self.visit(outer, PartRole::OuterBoundary, child, trace)?;
                self.visit_parts(kind, inner, PartRole::InnerBoundary, child, trace)?;
            }
            GeometryNode::Text(text) => {
                self.visit_scratch_point(text.location, PartRole::Location, child, trace)?;
            }
            GeometryNode::Ellipse(ellipse) => {
                let arc = ellipse
                    .boundary_as_arc()
                    .ok_or(DecompositionError::MissingPart {
                        kind,
                        part: PartRole::Boundary,
                    })?;
                self.visit(&GeometryNode::Arc(arc), PartRole::Boundary, child, trace)?;
            }
            GeometryNode::Face { area } => {
                let area = required(area, kind, PartRole::Area)?;
                self.visit(area, PartRole::Area, child, trace)?;
            }
            GeometryNode::Extrusion { base, .. } => {
                let base = required(base, kind, PartRole::Base)?;
                self.visit(base, PartRole::Base, child, trace)?;
            }
            GeometryNode::BRepSolid { outer, inner } => {
                let outer = required(outer, kind, PartRole::OuterSurface)?;
                self.visit(outer, PartRole::OuterSurface, child, trace)?;
                self.visit_parts(kind, inner, PartRole::InnerSurface, child, trace)?;
            }
            GeometryNode::CsgSolid(csg) => {
                let equivalent = ScopedGeometry::new(self.tools, self.tools.evaluate_csg(csg)?);
                self.visit(equivalent.get(), PartRole::CsgEquivalent, child, trace)?;
            }
        }

        trace.push(TraceEntry { kind, role, depth });
        debug!(kind = kind.name(), %role, depth, "visited");
        Ok(())
    }

    fn visit_parts(
        &self,
        kind: GeometryKind,
        parts: &[GeometryNode],
        role: PartRole,
        depth: usize,
        trace: &mut Trace,
    ) -> Result<()> {
        let _iter = PartIter::acquire(self.tools, kind);
        for part in parts {
            self.visit(part, role, depth, trace)?;
        }
        Ok(())
    }

    fn visit_arc(&self, arc: &ArcNode, depth: usize, trace: &mut Trace) -> Result<()> {
        let representation = self
            .tools
            .arc_representation(arc)
            .ok_or(DecompositionError::UnresolvedArc)?;
        trace!(?representation, "arc representation");

        match representation {
            ArcRepresentation::ByCenterPoint | ArcRepresentation::ByCenterPointStartEnd => {
                let mut scratch = ScopedGeometry::scratch_point(self.tools);
                let center = point_of(arc.center, PartRole::CenterPoint)?;
                self.visit_point_in(&mut scratch, center, PartRole::CenterPoint, depth, trace)?;
                if arc.has_explicit_endpoints() {
                    let start = point_of(arc.start, PartRole::StartPoint)?;
                    self.visit_point_in(&mut scratch, start, PartRole::StartPoint, depth, trace)?;
                    let end = point_of(arc.end, PartRole::EndPoint)?;
                    self.visit_point_in(&mut scratch, end, PartRole::EndPoint, depth, trace)?;
                }
            }
            ArcRepresentation::ByBulge => {
                let mut scratch = ScopedGeometry::scratch_point(self.tools);
                let start = point_of(arc.start, PartRole::StartPoint)?;
                self.visit_point_in(&mut scratch, start, PartRole::StartPoint, depth, trace)?;
                let end = point_of(arc.end, PartRole::EndPoint)?;
                self.visit_point_in(&mut scratch, end, PartRole::EndPoint, depth, trace)?;
                let bulge = arc.bulge.ok_or(DecompositionError::BulgeUnavailable)?;
                trace!(bulge, "arc bulge");
            }
            ArcRepresentation::By3Points => {
                let (start, mid, end) = arc
                    .properties_as_3_points()
                    .ok_or(DecompositionError::PointUnavailable {
                        role: PartRole::MidPoint,
                    })?;
                self.visit_scratch_point(start, PartRole::StartPoint, depth, trace)?;
                self.visit_scratch_point(mid, PartRole::MidPoint, depth, trace)?;
                self.visit_scratch_point(end, PartRole::EndPoint, depth, trace)?;
            }
        }
        Ok(())
    }

    fn visit_scratch_point(
        &self,
        at: Coord,
        role: PartRole,
        depth: usize,
        trace: &mut Trace,
    ) -> Result<()> {
        let mut scratch = ScopedGeometry::scratch_point(self.tools);
        self.visit_point_in(&mut scratch, at, role, depth, trace)
    }

    fn visit_point_in(
        &self,
        scratch: &mut ScopedGeometry<'_>,
        at: Coord,
        role: PartRole,
        depth: usize,
        trace: &mut Trace,
    ) -> Result<()> {
        scratch.set_point(at);
        self.visit(scratch.get(), role, depth, trace)
    }
}

fn required(
    part: &Option<Box<GeometryNode>>,
    kind: GeometryKind,
    role: PartRole,
) -> Result<&GeometryNode> {
    part.as_deref()
        .ok_or(DecompositionError::MissingPart { kind, part: role })
}

fn point_of(at: Option<Coord>, role: PartRole) -> Result<Coord> {
    at.ok_or(DecompositionError::PointUnavailable { role })
}
