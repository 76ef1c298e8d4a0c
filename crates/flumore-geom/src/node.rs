//! Closed geometry model handed to the writer.
//!
//! Composite variants own their children, so a tree is acyclic by
//! construction. Every variant serializes with a `"type"` tag, e.g.
//! `{"type":"polygon","boundary":{"type":"line","points":[...]}}`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn distance_2d(&self, other: &Coord) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// How an arc prefers to be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcRepresentation {
    ByCenterPoint,
    ByCenterPointStartEnd,
    ByBulge,
    By3Points,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcNode {
    pub center: Option<Coord>,
    pub start: Option<Coord>,
    pub mid: Option<Coord>,
    pub end: Option<Coord>,
    pub bulge: Option<f64>,
    /// Explicit preference; inferred from the populated fields when absent.
    pub representation: Option<ArcRepresentation>,
}

impl ArcNode {
    pub fn by_center(center: Coord) -> Self {
        Self {
            center: Some(center),
            representation: Some(ArcRepresentation::ByCenterPoint),
            ..Self::default()
        }
    }

    pub fn by_center_start_end(center: Coord, start: Coord, end: Coord) -> Self {
        Self {
            center: Some(center),
            start: Some(start),
            end: Some(end),
            representation: Some(ArcRepresentation::ByCenterPointStartEnd),
            ..Self::default()
        }
    }

    pub fn by_bulge(start: Coord, end: Coord, bulge: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            bulge: Some(bulge),
            representation: Some(ArcRepresentation::ByBulge),
            ..Self::default()
        }
    }

    pub fn by_3_points(start: Coord, mid: Coord, end: Coord) -> Self {
        Self {
            start: Some(start),
            mid: Some(mid),
            end: Some(end),
            representation: Some(ArcRepresentation::By3Points),
            ..Self::default()
        }
    }

    pub fn has_explicit_endpoints(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The representation this arc is cheapest to read back in, if any.
    pub fn optimal_representation(&self) -> Option<ArcRepresentation> {
        if self.representation.is_some() {
            return self.representation;
        }
        let ends = self.has_explicit_endpoints();
        if ends && self.bulge.is_some() {
            Some(ArcRepresentation::ByBulge)
        } else if ends && self.mid.is_some() {
            Some(ArcRepresentation::By3Points)
        } else if ends && self.center.is_some() {
            Some(ArcRepresentation::ByCenterPointStartEnd)
        } else if self.center.is_some() {
            Some(ArcRepresentation::ByCenterPoint)
        } else {
            None
        }
    }

    /// Start, mid and end points. The mid point is derived from the centre
    /// when it was not stored (counter-clockwise sweep from start to end).
    pub fn properties_as_3_points(&self) -> Option<(Coord, Coord, Coord)> {
        let start = self.start?;
        let end = self.end?;
        if let Some(mid) = self.mid {
            return Some((start, mid, end));
        }
        let center = self.center?;
        let radius = center.distance_2d(&start);
        if !(radius.is_finite() && radius > 0.0) {
            return None;
        }
        let a0 = (start.y - center.y).atan2(start.x - center.x);
        let mut a1 = (end.y - center.y).atan2(end.x - center.x);
        if a1 <= a0 {
            a1 += std::f64::consts::TAU;
        }
        let am = (a0 + a1) / 2.0;
        let mid = Coord::new_3d(
            center.x + radius * am.cos(),
            center.y + radius * am.sin(),
            (start.z + end.z) / 2.0,
        );
        Some((start, mid, end))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub location: Coord,
    #[serde(default)]
    pub string: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseNode {
    pub center: Coord,
    pub primary_radius: f64,
    pub secondary_radius: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl EllipseNode {
    /// Closed boundary arc, or `None` when the radii do not describe an ellipse.
    pub fn boundary_as_arc(&self) -> Option<ArcNode> {
        let valid = |r: f64| r.is_finite() && r > 0.0;
        if !valid(self.primary_radius) || !valid(self.secondary_radius) {
            return None;
        }
        Some(ArcNode::by_center(self.center))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsgOperation {
    Union,
    Intersection,
    Difference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsgSolid {
    pub operation: CsgOperation,
    pub left: Box<GeometryNode>,
    pub right: Box<GeometryNode>,
}

impl CsgSolid {
    pub fn new(operation: CsgOperation, left: GeometryNode, right: GeometryNode) -> Self {
        Self {
            operation,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryNode {
    Point(Coord),
    MultiPoint {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    Arc(ArcNode),
    Line {
        #[serde(default)]
        points: Vec<Coord>,
    },
    Path {
        #[serde(default)]
        segments: Vec<GeometryNode>,
    },
    MultiCurve {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    Polygon {
        boundary: Option<Box<GeometryNode>>,
    },
    Donut {
        outer: Option<Box<GeometryNode>>,
        #[serde(default)]
        inner: Vec<GeometryNode>,
    },
    MultiArea {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    Text(TextNode),
    MultiText {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    Ellipse(EllipseNode),
    Null,
    Raster {
        #[serde(default)]
        columns: u32,
        #[serde(default)]
        rows: u32,
    },
    Face {
        area: Option<Box<GeometryNode>>,
    },
    TriangleStrip {
        #[serde(default)]
        vertices: Vec<Coord>,
    },
    TriangleFan {
        #[serde(default)]
        vertices: Vec<Coord>,
    },
    Box {
        min: Coord,
        max: Coord,
    },
    Extrusion {
        base: Option<Box<GeometryNode>>,
        #[serde(default)]
        direction: Coord,
    },
    #[serde(rename = "brep_solid")]
    BRepSolid {
        outer: Option<Box<GeometryNode>>,
        #[serde(default)]
        inner: Vec<GeometryNode>,
    },
    CompositeSurface {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    RectangleFace {
        origin: Coord,
        width: f64,
        height: f64,
    },
    MultiSurface {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    MultiSolid {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    CompositeSolid {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
    #[serde(rename = "csg_solid")]
    CsgSolid(CsgSolid),
    Mesh {
        #[serde(default)]
        vertices: Vec<Coord>,
        #[serde(default)]
        faces: Vec<Vec<usize>>,
    },
    PointCloud {
        #[serde(default)]
        points: Vec<Coord>,
    },
    FeatureTable {
        #[serde(default)]
        row_count: usize,
    },
    Aggregate {
        #[serde(default)]
        parts: Vec<GeometryNode>,
    },
}

impl GeometryNode {
    pub fn point(x: f64, y: f64) -> Self {
        GeometryNode::Point(Coord::new(x, y))
    }

    pub fn line(points: Vec<Coord>) -> Self {
        GeometryNode::Line { points }
    }

    pub fn polygon(boundary: GeometryNode) -> Self {
        GeometryNode::Polygon {
            boundary: Some(Box::new(boundary)),
        }
    }

    pub fn aggregate(parts: Vec<GeometryNode>) -> Self {
        GeometryNode::Aggregate { parts }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GeometryNode::Null)
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            GeometryNode::Point(_) => GeometryKind::Point,
            GeometryNode::MultiPoint { .. } => GeometryKind::MultiPoint,
            GeometryNode::Arc(_) => GeometryKind::Arc,
            GeometryNode::Line { .. } => GeometryKind::Line,
            GeometryNode::Path { .. } => GeometryKind::Path,
            GeometryNode::MultiCurve { .. } => GeometryKind::MultiCurve,
            GeometryNode::Polygon { .. } => GeometryKind::Polygon,
            GeometryNode::Donut { .. } => GeometryKind::Donut,
            GeometryNode::MultiArea { .. } => GeometryKind::MultiArea,
            GeometryNode::Text(_) => GeometryKind::Text,
            GeometryNode::MultiText { .. } => GeometryKind::MultiText,
            GeometryNode::Ellipse(_) => GeometryKind::Ellipse,
            GeometryNode::Null => GeometryKind::Null,
            GeometryNode::Raster { .. } => GeometryKind::Raster,
            GeometryNode::Face { .. } => GeometryKind::Face,
            GeometryNode::TriangleStrip { .. } => GeometryKind::TriangleStrip,
            GeometryNode::TriangleFan { .. } => GeometryKind::TriangleFan,
            GeometryNode::Box { .. } => GeometryKind::Box,
            GeometryNode::Extrusion { .. } => GeometryKind::Extrusion,
            GeometryNode::BRepSolid { .. } => GeometryKind::BRepSolid,
            GeometryNode::CompositeSurface { .. } => GeometryKind::CompositeSurface,
            GeometryNode::RectangleFace { .. } => GeometryKind::RectangleFace,
            GeometryNode::MultiSurface { .. } => GeometryKind::MultiSurface,
            GeometryNode::MultiSolid { .. } => GeometryKind::MultiSolid,
            GeometryNode::CompositeSolid { .. } => GeometryKind::CompositeSolid,
            GeometryNode::CsgSolid(_) => GeometryKind::CsgSolid,
            GeometryNode::Mesh { .. } => GeometryKind::Mesh,
            GeometryNode::PointCloud { .. } => GeometryKind::PointCloud,
            GeometryNode::FeatureTable { .. } => GeometryKind::FeatureTable,
            GeometryNode::Aggregate { .. } => GeometryKind::Aggregate,
        }
    }
}

impl Default for GeometryNode {
    fn default() -> Self {
        GeometryNode::Null
    }
}

/// Payload-free discriminant of [`GeometryNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    MultiPoint,
    Arc,
    Line,
    Path,
    MultiCurve,
    Polygon,
    Donut,
    MultiArea,
    Text,
    MultiText,
    Ellipse,
    Null,
    Raster,
    Face,
    TriangleStrip,
    TriangleFan,
    Box,
    Extrusion,
    BRepSolid,
    CompositeSurface,
    RectangleFace,
    MultiSurface,
    MultiSolid,
    CompositeSolid,
    CsgSolid,
    Mesh,
    PointCloud,
    FeatureTable,
    Aggregate,
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "point",
            GeometryKind::MultiPoint => "multi point",
            GeometryKind::Arc => "arc",
            GeometryKind::Line => "line",
            GeometryKind::Path => "path",
            GeometryKind::MultiCurve => "multi curve",
            GeometryKind::Polygon => "polygon",
            GeometryKind::Donut => "donut",
            GeometryKind::MultiArea => "multi area",
            GeometryKind::Text => "text",
            GeometryKind::MultiText => "multi text",
            GeometryKind::Ellipse => "ellipse",
            GeometryKind::Null => "null",
            GeometryKind::Raster => "raster",
            GeometryKind::Face => "face",
            GeometryKind::TriangleStrip => "triangle strip",
            GeometryKind::TriangleFan => "triangle fan",
            GeometryKind::Box => "box",
            GeometryKind::Extrusion => "extrusion",
            GeometryKind::BRepSolid => "brep solid",
            GeometryKind::CompositeSurface => "composite surface",
            GeometryKind::RectangleFace => "rectangle face",
            GeometryKind::MultiSurface => "multi surface",
            GeometryKind::MultiSolid => "multi solid",
            GeometryKind::CompositeSolid => "composite solid",
            GeometryKind::CsgSolid => "csg solid",
            GeometryKind::Mesh => "mesh",
            GeometryKind::PointCloud => "point cloud",
            GeometryKind::FeatureTable => "feature table",
            GeometryKind::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_representation_is_inferred_from_fields() {
        let mut arc = ArcNode::default();
        assert_eq!(arc.optimal_representation(), None);

        arc.center = Some(Coord::new(0.0, 0.0));
        assert_eq!(
            arc.optimal_representation(),
            Some(ArcRepresentation::ByCenterPoint)
        );

        arc.start = Some(Coord::new(1.0, 0.0));
        arc.end = Some(Coord::new(0.0, 1.0));
        assert_eq!(
            arc.optimal_representation(),
            Some(ArcRepresentation::ByCenterPointStartEnd)
        );

        arc.bulge = Some(0.4);
        assert_eq!(arc.optimal_representation(), Some(ArcRepresentation::ByBulge));

        arc.representation = Some(ArcRepresentation::By3Points);
        assert_eq!(
            arc.optimal_representation(),
            Some(ArcRepresentation::By3Points)
        );
    }

    #[test]
    fn derived_mid_point_lies_on_the_arc() {
        let arc = ArcNode::by_center_start_end(
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(-1.0, 0.0),
        );
        let (_, mid, _) = arc.properties_as_3_points().unwrap();
        assert!((mid.x).abs() < 1e-9);
        assert!((mid.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_ellipse_has_no_boundary() {
        let ellipse = EllipseNode {
            center: Coord::new(0.0, 0.0),
            primary_radius: 2.0,
            secondary_radius: 0.0,
            rotation: 0.0,
        };
        assert!(ellipse.boundary_as_arc().is_none());
    }

    #[test]
    fn geometry_json_uses_type_tags() {
        let json = r#"{"type":"polygon","boundary":{"type":"line","points":[{"x":0,"y":0},{"x":1,"y":0}]}}"#;
        let node: GeometryNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind(), GeometryKind::Polygon);
        match node {
            GeometryNode::Polygon { boundary: Some(b) } => {
                assert_eq!(b.kind(), GeometryKind::Line)
            }
            other => panic!("unexpected {other:?}"),
        }

        let back = serde_json::to_string(&GeometryNode::point(1.0, 2.0)).unwrap();
        assert!(back.contains(r#""type":"point""#));
    }
}
