//! Closed primitive builders. Every primitive is a watertight island with
//! outward-facing loops.

use crate::error::{MeshError, MeshResult};
use crate::material::Material;
use crate::mesh::{FaceId, MeshModel, VertexId};
use glam::{Mat4, Vec3};

/// Face order returned by [`MeshModel::add_box`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxFace {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl MeshModel {
    /// Axis-aligned box. Faces are returned in [`BoxFace`] order.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, material: Material) -> MeshResult<[FaceId; 6]> {
        if half_extents.min_element() <= 0.0 {
            return Err(MeshError::Degenerate {
                operation: "add_box",
                reason: "non-positive extent",
            });
        }
        let base = self.vertex_count() as VertexId;
        for i in 0..8u32 {
            let sx = if i & 1 == 0 { -1.0 } else { 1.0 };
            let sy = if i & 2 == 0 { -1.0 } else { 1.0 };
            let sz = if i & 4 == 0 { -1.0 } else { 1.0 };
            self.add_vertex(center + half_extents * Vec3::new(sx, sy, sz));
        }
        // corner index bits: x = 1, y = 2, z = 4
        let loops: [[u32; 4]; 6] = [
            [1, 3, 7, 5],
            [0, 4, 6, 2],
            [3, 2, 6, 7],
            [0, 1, 5, 4],
            [4, 5, 7, 6],
            [0, 2, 3, 1],
        ];
        let mut faces = [FaceId(0); 6];
        for (slot, l) in faces.iter_mut().zip(loops) {
            *slot = self.add_face(l.iter().map(|&i| base + i).collect(), material)?;
        }
        Ok(faces)
    }

    /// Closed frustum centred on the local origin, axis along local +Z,
    /// spanning `depth`. A zero radius collapses that end into an apex.
    ///
    /// Returns the created faces: sides first, then caps.
    pub fn add_frustum(
        &mut self,
        transform: &Mat4,
        segments: u32,
        radius_bottom: f32,
        radius_top: f32,
        depth: f32,
        material: Material,
    ) -> MeshResult<Vec<FaceId>> {
        const OP: &str = "add_frustum";
        if segments < 3 {
            return Err(MeshError::Degenerate {
                operation: OP,
                reason: "fewer than three segments",
            });
        }
        if !(depth > 0.0) || radius_bottom < 0.0 || radius_top < 0.0 || radius_bottom.max(radius_top) <= 0.0 {
            return Err(MeshError::Degenerate {
                operation: OP,
                reason: "non-positive depth or radius",
            });
        }

        self.try_apply(|mesh| {
            let bottom = mesh.add_ring(transform, segments, radius_bottom, -depth * 0.5);
            let top = mesh.add_ring(transform, segments, radius_top, depth * 0.5);
            let n = segments as usize;
            let mut faces = Vec::with_capacity(n + 2);
            for i in 0..n {
                let j = (i + 1) % n;
                let mut quad = vec![bottom[i], bottom[j], top[j], top[i]];
                quad.dedup();
                if quad.first() == quad.last() {
                    quad.pop();
                }
                faces.push(mesh.add_face(quad, material)?);
            }
            if radius_bottom > 0.0 {
                faces.push(mesh.add_face(bottom.iter().rev().copied().collect(), material)?);
            }
            if radius_top > 0.0 {
                faces.push(mesh.add_face(top.clone(), material)?);
            }
            Ok(faces)
        })
    }

    /// UV sphere centred on the local origin with poles on local Z.
    pub fn add_uv_sphere(
        &mut self,
        transform: &Mat4,
        radius: f32,
        segments: u32,
        rings: u32,
        material: Material,
    ) -> MeshResult<Vec<FaceId>> {
        if segments < 3 || rings < 2 || !(radius > 0.0) {
            return Err(MeshError::Degenerate {
                operation: "add_uv_sphere",
                reason: "too few segments/rings or non-positive radius",
            });
        }

        self.try_apply(|mesh| {
            let north = mesh.add_vertex(transform.transform_point3(Vec3::Z * radius));
            let mut bands: Vec<Vec<VertexId>> = Vec::with_capacity(rings as usize - 1);
            for ring in 1..rings {
                let phi = ring as f32 / rings as f32 * std::f32::consts::PI;
                bands.push(mesh.add_ring(transform, segments, radius * phi.sin(), radius * phi.cos()));
            }
            let south = mesh.add_vertex(transform.transform_point3(-Vec3::Z * radius));

            let n = segments as usize;
            let mut faces = Vec::new();
            for i in 0..n {
                let j = (i + 1) % n;
                faces.push(mesh.add_face(vec![north, bands[0][i], bands[0][j]], material)?);
            }
            for pair in bands.windows(2) {
                let (upper, lower) = (&pair[0], &pair[1]);
                for i in 0..n {
                    let j = (i + 1) % n;
                    faces.push(mesh.add_face(vec![upper[i], lower[i], lower[j], upper[j]], material)?);
                }
            }
            let last = &bands[bands.len() - 1];
            for i in 0..n {
                let j = (i + 1) % n;
                faces.push(mesh.add_face(vec![south, last[j], last[i]], material)?);
            }
            Ok(faces)
        })
    }

    /// Ring of vertices counter-clockwise about local +Z at height `z`.
    /// A zero radius yields a single shared apex vertex.
    fn add_ring(&mut self, transform: &Mat4, segments: u32, radius: f32, z: f32) -> Vec<VertexId> {
        if radius <= 0.0 {
            let apex = self.add_vertex(transform.transform_point3(Vec3::new(0.0, 0.0, z)));
            return vec![apex; segments as usize];
        }
        (0..segments)
            .map(|i| {
                let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
                let local = Vec3::new(angle.cos() * radius, angle.sin() * radius, z);
                self.add_vertex(transform.transform_point3(local))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::Adjacency;
    use approx::assert_relative_eq;

    #[test]
    fn box_faces_point_outward() {
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Material::Hull).unwrap();
        let expected = [Vec3::X, -Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z];
        for (f, n) in faces.iter().zip(expected) {
            assert!((mesh.face_normal(*f).unwrap() - n).length() < 1e-5);
        }
        assert_eq!(mesh.vertex_count(), 8);
        assert!(Adjacency::build(&mesh).is_closed_manifold());
    }

    #[test]
    fn frustum_is_closed() {
        let mut mesh = MeshModel::new();
        let faces = mesh
            .add_frustum(&Mat4::IDENTITY, 8, 1.0, 0.5, 2.0, Material::Hull)
            .unwrap();
        assert_eq!(faces.len(), 10);
        assert!(Adjacency::build(&mesh).is_closed_manifold());
        assert!(mesh.validate().is_ok());
        let top = *faces.last().unwrap();
        assert_relative_eq!(mesh.face_normal(top).unwrap().z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn cone_collapses_to_apex() {
        let mut mesh = MeshModel::new();
        let faces = mesh
            .add_frustum(&Mat4::IDENTITY, 5, 0.0, 0.3, 1.0, Material::HullDark)
            .unwrap();
        assert_eq!(faces.len(), 6);
        assert!(faces[..5].iter().all(|f| mesh.face(*f).unwrap().len() == 3));
        assert!(Adjacency::build(&mesh).is_closed_manifold());
    }

    #[test]
    fn frustum_rejects_bad_parameters() {
        let mut mesh = MeshModel::new();
        assert!(mesh.add_frustum(&Mat4::IDENTITY, 2, 1.0, 1.0, 1.0, Material::Hull).is_err());
        assert!(mesh.add_frustum(&Mat4::IDENTITY, 8, 0.0, 0.0, 1.0, Material::Hull).is_err());
        assert!(mesh.add_frustum(&Mat4::IDENTITY, 8, 1.0, 1.0, 0.0, Material::Hull).is_err());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn sphere_is_closed_and_outward() {
        let mut mesh = MeshModel::new();
        let faces = mesh
            .add_uv_sphere(&Mat4::from_translation(Vec3::X * 3.0), 1.0, 8, 5, Material::Hull)
            .unwrap();
        assert_eq!(faces.len(), 8 * 5);
        assert!(Adjacency::build(&mesh).is_closed_manifold());
        for f in faces {
            let c = mesh.face_centroid(f).unwrap() - Vec3::X * 3.0;
            assert!(mesh.face_normal(f).unwrap().dot(c) > 0.0);
        }
    }
}
