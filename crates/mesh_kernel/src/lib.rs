//! Minimal polygon-mesh kernel used by the spaceship generator.
//!
//! This crate provides the foundational geometry types the pipeline mutates:
//! - `MeshModel`: indexed vertices plus ordered polygon loops
//! - Face operations (extrude, inset, grid subdivide) that refuse to create
//!   degenerate faces
//! - Closed primitives (box, frustum/cone, UV sphere)
//! - Global finishing operations (chamfer bevel, bisect + mirror)
//! - Transform and face-frame utilities

pub mod adjacency;
pub mod bevel;
pub mod error;
pub mod material;
pub mod mesh;
pub mod mirror;
pub mod ops;
pub mod primitives;
pub mod transform;

pub use adjacency::*;
pub use bevel::*;
pub use error::*;
pub use material::*;
pub use mesh::*;
pub use mirror::*;
pub use ops::*;
pub use primitives::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
