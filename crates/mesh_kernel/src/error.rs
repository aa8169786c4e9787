//! Kernel error type.

use crate::mesh::{FaceId, VertexId};
use thiserror::Error;

/// Errors raised by mesh kernel operations.
///
/// Every mutating operation validates its result before committing, so an
/// `Err` always means the mesh was left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The operation would produce a face with fewer than three distinct
    /// vertices, zero area, a non-positive scale, or a flipped normal.
    #[error("degenerate geometry in {operation}: {reason}")]
    Degenerate {
        operation: &'static str,
        reason: &'static str,
    },

    /// The face id does not name a live face.
    #[error("face {0:?} does not exist")]
    UnknownFace(FaceId),

    /// A face references a vertex index past the end of the vertex array.
    #[error("vertex {0} does not exist")]
    UnknownVertex(VertexId),

    /// The operation only works on quads.
    #[error("face {face:?} has {sides} sides, expected 4")]
    NotAQuad { face: FaceId, sides: usize },

    /// A vertex is not referenced by any face.
    #[error("vertex {0} is not referenced by any face")]
    OrphanVertex(VertexId),

    /// Operation requires a closed 2-manifold surface.
    #[error("mesh is not a closed 2-manifold: {0}")]
    NonManifold(String),

    /// Two faces share the same vertex set.
    #[error("face {0:?} duplicates another face")]
    DuplicateFace(FaceId),

    /// Mirroring left boundary edges along the mirror plane.
    #[error("mirror seam left {0} open edges")]
    OpenSeam(usize),

    /// Nothing lies on the kept side of the mirror plane.
    #[error("no geometry on the kept side of the mirror plane")]
    EmptyHalf,
}

/// Result alias for kernel operations.
pub type MeshResult<T> = Result<T, MeshError>;
