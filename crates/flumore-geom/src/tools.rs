//! Geometry tool capabilities the decomposer borrows from its host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{DecompositionError, Result};
use crate::node::{ArcNode, ArcRepresentation, Coord, CsgOperation, CsgSolid, GeometryKind, GeometryNode};

/// Host-side geometry factory.
///
/// Everything returned by `create_point` or `evaluate_csg` must be handed back
/// to `destroy_geometry` exactly once; the decomposer does this through
/// [`crate::guard::ScopedGeometry`].
pub trait GeometryTools: Send + Sync {
    fn create_point(&self) -> GeometryNode;

    fn destroy_geometry(&self, geometry: GeometryNode);

    /// Replace a CSG tree by an equivalent `Null`, `BRepSolid` or `MultiSolid`.
    fn evaluate_csg(&self, csg: &CsgSolid) -> Result<GeometryNode>;

    fn arc_representation(&self, arc: &ArcNode) -> Option<ArcRepresentation> {
        arc.optimal_representation()
    }

    fn acquire_iterator(&self, _kind: GeometryKind) {}

    fn release_iterator(&self, _kind: GeometryKind) {}
}

#[derive(Debug, Default)]
struct LedgerInner {
    created: AtomicUsize,
    destroyed: AtomicUsize,
    iterators_acquired: AtomicUsize,
    iterators_released: AtomicUsize,
    csg_evaluations: AtomicUsize,
}

/// Shared counters pairing every creation with its release.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    inner: Arc<LedgerInner>,
}

/// Point-in-time copy of a [`ResourceLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerSnapshot {
    pub created: usize,
    pub destroyed: usize,
    pub iterators_acquired: usize,
    pub iterators_released: usize,
    pub csg_evaluations: usize,
}

impl LedgerSnapshot {
    /// Geometries and iterators still held.
    pub fn outstanding(&self) -> usize {
        self.created.saturating_sub(self.destroyed)
            + self
                .iterators_acquired
                .saturating_sub(self.iterators_released)
    }

    pub fn is_balanced(&self) -> bool {
        self.created == self.destroyed && self.iterators_acquired == self.iterators_released
    }
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let i = &self.inner;
        LedgerSnapshot {
            created: i.created.load(Ordering::Acquire),
            destroyed: i.destroyed.load(Ordering::Acquire),
            iterators_acquired: i.iterators_acquired.load(Ordering::Acquire),
            iterators_released: i.iterators_released.load(Ordering::Acquire),
            csg_evaluations: i.csg_evaluations.load(Ordering::Acquire),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.snapshot().outstanding()
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::AcqRel);
    }
}

/// Bundled tools for standalone use.
///
/// CSG evaluation only resolves identities (unions, and intersections or
/// differences with an empty operand); true solid booleans are reported as
/// `CsgEvaluation` failures.
#[derive(Debug, Clone, Default)]
pub struct StandardGeometryTools {
    ledger: ResourceLedger,
}

impl StandardGeometryTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }
}

impl GeometryTools for StandardGeometryTools {
    fn create_point(&self) -> GeometryNode {
        ResourceLedger::bump(&self.ledger.inner.created);
        GeometryNode::Point(Coord::default())
    }

    fn destroy_geometry(&self, _geometry: GeometryNode) {
        ResourceLedger::bump(&self.ledger.inner.destroyed);
    }

    fn evaluate_csg(&self, csg: &CsgSolid) -> Result<GeometryNode> {
        ResourceLedger::bump(&self.ledger.inner.csg_evaluations);
        let equivalent = evaluate_identity(csg)?;
        ResourceLedger::bump(&self.ledger.inner.created);
        Ok(equivalent)
    }

    fn acquire_iterator(&self, _kind: GeometryKind) {
        ResourceLedger::bump(&self.ledger.inner.iterators_acquired);
    }

    fn release_iterator(&self, _kind: GeometryKind) {
        ResourceLedger::bump(&self.ledger.inner.iterators_released);
    }
}

fn evaluate_identity(csg: &CsgSolid) -> Result<GeometryNode> {
    let left = resolve_operand(&csg.left)?;
    let right = resolve_operand(&csg.right)?;
    match csg.operation {
        CsgOperation::Union => Ok(solid_result(vec![left, right])),
        CsgOperation::Intersection if left.is_null() || right.is_null() => Ok(GeometryNode::Null),
        CsgOperation::Difference if left.is_null() => Ok(GeometryNode::Null),
        CsgOperation::Difference if right.is_null() => Ok(solid_result(vec![left])),
        op => Err(DecompositionError::CsgEvaluation(format!(
            "{op:?} of {} and {} requires a solid modelling kernel",
            left.kind(),
            right.kind()
        ))),
    }
}

/// Nested CSG operands are evaluated before the enclosing operation.
fn resolve_operand(operand: &GeometryNode) -> Result<GeometryNode> {
    match operand {
        GeometryNode::CsgSolid(inner) => evaluate_identity(inner),
        other => Ok(other.clone()),
    }
}

/// Result is always `Null`, `BRepSolid` or `MultiSolid`.
fn solid_result(mut parts: Vec<GeometryNode>) -> GeometryNode {
    parts.retain(|g| !g.is_null());
    match parts.len() {
        0 => GeometryNode::Null,
        1 if matches!(
            parts[0].kind(),
            GeometryKind::BRepSolid | GeometryKind::MultiSolid
        ) =>
        {
            parts.remove(0)
        }
        _ => GeometryNode::MultiSolid { parts },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid() -> GeometryNode {
        GeometryNode::BRepSolid {
            outer: Some(Box::new(GeometryNode::CompositeSurface { parts: vec![] })),
            inner: vec![],
        }
    }

    #[test]
    fn union_keeps_single_solid_and_wraps_pairs() {
        let tools = StandardGeometryTools::new();
        let single = CsgSolid::new(CsgOperation::Union, solid(), GeometryNode::Null);
        assert_eq!(tools.evaluate_csg(&single).unwrap().kind(), GeometryKind::BRepSolid);

        let pair = CsgSolid::new(CsgOperation::Union, solid(), solid());
        match tools.evaluate_csg(&pair).unwrap() {
            GeometryNode::MultiSolid { parts } => assert_eq!(parts.len(), 2),
            other => panic!("unexpected {other:?}"),
        }

        let empty = CsgSolid::new(CsgOperation::Union, GeometryNode::Null, GeometryNode::Null);
        assert!(tools.evaluate_csg(&empty).unwrap().is_null());
    }

    #[test]
    fn non_identity_booleans_are_rejected() {
        let tools = StandardGeometryTools::new();
        let diff = CsgSolid::new(CsgOperation::Difference, solid(), GeometryNode::Null);
        assert_eq!(tools.evaluate_csg(&diff).unwrap(), solid());

        let real = CsgSolid::new(CsgOperation::Intersection, solid(), solid());
        assert!(matches!(
            tools.evaluate_csg(&real),
            Err(DecompositionError::CsgEvaluation(_))
        ));
        let snap = tools.ledger().snapshot();
        assert_eq!(snap.csg_evaluations, 2);
        assert_eq!(snap.created, 1);
    }

    #[test]
    fn difference_with_empty_operand_yields_solid_kinds() {
        let tools = StandardGeometryTools::new();
        let line = GeometryNode::line(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]);

        let diff = CsgSolid::new(CsgOperation::Difference, line.clone(), GeometryNode::Null);
        assert_eq!(
            tools.evaluate_csg(&diff).unwrap(),
            GeometryNode::MultiSolid { parts: vec![line] }
        );

        let nested = GeometryNode::CsgSolid(CsgSolid::new(
            CsgOperation::Union,
            solid(),
            GeometryNode::Null,
        ));
        let diff = CsgSolid::new(CsgOperation::Difference, nested, GeometryNode::Null);
        let result = tools.evaluate_csg(&diff).unwrap();
        assert_eq!(result.kind(), GeometryKind::BRepSolid);
        assert_eq!(result, solid());

        let empty = GeometryNode::CsgSolid(CsgSolid::new(
            CsgOperation::Intersection,
            solid(),
            GeometryNode::Null,
        ));
        let diff = CsgSolid::new(CsgOperation::Difference, empty, solid());
        assert!(tools.evaluate_csg(&diff).unwrap().is_null());
    }

    #[test]
    fn ledger_tracks_pairing() {
        let tools = StandardGeometryTools::new();
        let p = tools.create_point();
        tools.acquire_iterator(GeometryKind::Aggregate);
        assert_eq!(tools.ledger().outstanding(), 2);
        tools.destroy_geometry(p);
        tools.release_iterator(GeometryKind::Aggregate);
        assert!(tools.ledger().snapshot().is_balanced());
    }
}
