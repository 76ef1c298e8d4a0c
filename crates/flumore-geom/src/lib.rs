#![forbid(unsafe_code)]
//! flumore-geom: geometry model and the recursive decomposition visitor used
//! by the FLUMORE writer.
//!
//! Host geometry services are reached only through [`GeometryTools`]; every
//! scratch geometry and part iterator the visitor takes from them is held by
//! an RAII guard so it is handed back on success and failure alike.

pub mod error;
pub mod guard;
pub mod node;
pub mod tools;
pub mod trace;
pub mod visitor;

pub use error::{DecompositionError, Result};
pub use guard::{PartIter, ScopedGeometry};
pub use node::{
    ArcNode, ArcRepresentation, Coord, CsgOperation, CsgSolid, EllipseNode, GeometryKind,
    GeometryNode, TextNode,
};
pub use tools::{GeometryTools, LedgerSnapshot, ResourceLedger, StandardGeometryTools};
pub use trace::{PartRole, Trace, TraceEntry};
pub use visitor::Decomposer;
