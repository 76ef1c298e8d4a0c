use thiserror::Error;

use crate::node::GeometryKind;
use crate::trace::PartRole;

/// Result type local to flumore-geom.
pub type Result<T> = std::result::Result<T, DecompositionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecompositionError {
    #[error("{kind} geometry is missing its {part}")]
    MissingPart { kind: GeometryKind, part: PartRole },

    #[error("arc has no resolvable representation")]
    UnresolvedArc,

    #[error("arc {role} is unavailable")]
    PointUnavailable { role: PartRole },

    #[error("arc bulge is unavailable")]
    BulgeUnavailable,

    #[error("CSG evaluation failed: {0}")]
    CsgEvaluation(String),

    #[error("geometry nesting exceeds depth limit {limit}")]
    DepthExceeded { limit: usize },
}
