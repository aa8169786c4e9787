//! The finished ship handed to callers.

use crate::asymmetry::AsymmetryReport;
use crate::details::DetailReport;
use crate::finish::MaterialPalette;
use crate::hull::HullReport;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use mesh_kernel::{Axis, BevelReport, Material, MeshModel, MeshResult};

/// Render-ready vertex: one per face corner.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShipVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub material: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipFace {
    /// Indices into [`ShipMesh::positions`], counter-clockwise from outside.
    pub vertices: Vec<u32>,
    pub normal: Vec3,
    /// Cube-projected UV per corner, parallel to `vertices`.
    pub uvs: Vec<Vec2>,
}

/// Final polygon mesh. Faces are in the same order as the material
/// assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipMesh {
    pub positions: Vec<Vec3>,
    pub faces: Vec<ShipFace>,
}

impl ShipMesh {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Exactly one material class per face, indexed like [`ShipMesh::faces`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialAssignment {
    materials: Vec<Material>,
}

impl MaterialAssignment {
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    pub fn get(&self, face: usize) -> Option<Material> {
        self.materials.get(face).copied()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Material> + '_ {
        self.materials.iter().copied()
    }

    pub fn count(&self, material: Material) -> usize {
        self.materials.iter().filter(|m| **m == material).count()
    }
}

/// What each stage did during one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub hull: HullReport,
    pub asymmetry: AsymmetryReport,
    pub details: DetailReport,
    /// Mirrors that were applied, in order.
    pub mirrors: Vec<Axis>,
    /// Planned mirrors skipped because the seam would not weld.
    pub weld_fallbacks: Vec<Axis>,
    /// `None` when the bevel was disabled or had to be skipped.
    pub bevel: Option<BevelReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spaceship {
    /// Resolved seed, so clock-seeded runs can be reproduced.
    pub seed: u64,
    pub mesh: ShipMesh,
    pub materials: MaterialAssignment,
    pub palette: MaterialPalette,
    pub report: GenerationReport,
}

impl Spaceship {
    /// Fan-triangulated vertex and index buffers.
    pub fn triangulate(&self) -> (Vec<ShipVertex>, Vec<u32>) {
        let corners: usize = self.mesh.faces.iter().map(|f| f.vertices.len()).sum();
        let mut vertices = Vec::with_capacity(corners);
        let mut indices = Vec::with_capacity(corners.saturating_sub(2) * 3);
        for (i, face) in self.mesh.faces.iter().enumerate() {
            let material = self.materials.get(i).unwrap_or_default().index();
            let base = vertices.len() as u32;
            for (v, uv) in face.vertices.iter().zip(&face.uvs) {
                vertices.push(ShipVertex {
                    position: self.mesh.positions[*v as usize].to_array(),
                    normal: face.normal.to_array(),
                    uv: uv.to_array(),
                    material,
                });
            }
            for k in 1..face.vertices.len().saturating_sub(1) as u32 {
                indices.extend_from_slice(&[base, base + k, base + k + 1]);
            }
        }
        (vertices, indices)
    }

    /// Rebuild a kernel mesh, e.g. to run the kernel's checks on the output.
    pub fn to_model(&self) -> MeshResult<MeshModel> {
        let mut model = MeshModel::new();
        for p in &self.mesh.positions {
            model.add_vertex(*p);
        }
        for (i, face) in self.mesh.faces.iter().enumerate() {
            model.add_face(face.vertices.clone(), self.materials.get(i).unwrap_or_default())?;
        }
        Ok(model)
    }
}
