//! Face operations: extrude, inset and grid subdivision.

use crate::error::{MeshError, MeshResult};
use crate::mesh::{checked_points_normal, FaceId, MeshModel, VertexId};
use glam::{Quat, Vec2, Vec3};

/// Parameters for [`MeshModel::extrude_face`].
///
/// The new cap is built from the old loop by scaling in the face plane
/// (around the face centre, along the face frame's X/Y axes), rotating about
/// the face centre, pushing `distance` along the face normal and finally
/// adding the world-space `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeParams {
    pub distance: f32,
    pub scale: Vec2,
    pub rotation: Quat,
    pub offset: Vec3,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            distance: 0.0,
            scale: Vec2::ONE,
            rotation: Quat::IDENTITY,
            offset: Vec3::ZERO,
        }
    }
}

impl ExtrudeParams {
    pub fn along_normal(distance: f32) -> Self {
        Self {
            distance,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec2::splat(scale))
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }
}

/// Faces created by an extrusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Extrusion {
    /// The new outer face that replaced the extruded one.
    pub cap: FaceId,
    /// Side faces stitching the old boundary to the cap, one per edge.
    pub sides: Vec<FaceId>,
}

impl MeshModel {
    /// Replace `face` by a transformed copy and stitch side faces between
    /// the old and new boundary.
    ///
    /// Fails with `Degenerate` (leaving the mesh untouched) if any scale
    /// component is not positive, if the cap or any side face would have no
    /// area, or if the cap would face backwards.
    pub fn extrude_face(&mut self, face: FaceId, params: &ExtrudeParams) -> MeshResult<Extrusion> {
        const OP: &str = "extrude_face";
        if !(params.scale.x > 0.0 && params.scale.y > 0.0) || !params.scale.is_finite() {
            return Err(MeshError::Degenerate {
                operation: OP,
                reason: "non-positive scale",
            });
        }
        if !params.distance.is_finite() || !params.offset.is_finite() || !params.rotation.is_finite() {
            return Err(MeshError::Degenerate {
                operation: OP,
                reason: "non-finite parameters",
            });
        }

        let source = self.face(face)?.clone();
        let frame = self.face_frame(face)?;
        let old: Vec<Vec3> = self.face_positions(face)?;

        let new: Vec<Vec3> = old
            .iter()
            .map(|&p| {
                let local = frame.to_local(p);
                let scaled = frame.x * (local.x * params.scale.x)
                    + frame.y * (local.y * params.scale.y)
                    + frame.z * local.z;
                frame.origin + params.rotation * scaled + frame.z * params.distance + params.offset
            })
            .collect();

        let cap_normal = checked_points_normal(&new, OP)?;
        if cap_normal.dot(frame.z) <= 0.0 {
            return Err(MeshError::Degenerate {
                operation: OP,
                reason: "cap normal flipped",
            });
        }
        let n = old.len();
        for i in 0..n {
            let j = (i + 1) % n;
            checked_points_normal(&[old[i], old[j], new[j], new[i]], OP)?;
        }

        let base = self.vertex_count() as VertexId;
        for p in &new {
            self.add_vertex(*p);
        }
        self.remove_face(face)?;
        let cap_loop: Vec<VertexId> = (0..n as VertexId).map(|i| base + i).collect();
        let cap = self.add_face(cap_loop, source.material)?;
        let mut sides = Vec::with_capacity(n);
        for i in 0..n {
            let j = (i + 1) % n;
            let quad = vec![
                source.vertices[i],
                source.vertices[j],
                base + j as VertexId,
                base + i as VertexId,
            ];
            sides.push(self.add_face(quad, source.material)?);
        }
        Ok(Extrusion { cap, sides })
    }

    /// Shrink a face toward its centre, leaving a ring of faces around it.
    /// `amount` is the fraction removed, in (0, 1).
    pub fn inset_face(&mut self, face: FaceId, amount: f32) -> MeshResult<Extrusion> {
        if !(amount > 0.0 && amount < 1.0) {
            return Err(MeshError::Degenerate {
                operation: "inset_face",
                reason: "inset amount outside (0, 1)",
            });
        }
        self.extrude_face(face, &ExtrudeParams::default().with_uniform_scale(1.0 - amount))
    }

    /// Split a quad into a `(cuts_u + 1) x (cuts_v + 1)` grid of quads.
    ///
    /// The new vertices on the quad's boundary are also inserted into the
    /// neighbouring faces sharing those edges, so no T-junctions are left.
    /// Cells are returned row by row, starting at the face's first vertex.
    pub fn subdivide_face(&mut self, face: FaceId, cuts_u: u32, cuts_v: u32) -> MeshResult<Vec<FaceId>> {
        let source = self.face(face)?.clone();
        if source.len() != 4 {
            return Err(MeshError::NotAQuad {
                face,
                sides: source.len(),
            });
        }
        if cuts_u == 0 && cuts_v == 0 {
            return Ok(vec![face]);
        }
        let corners = self.face_positions(face)?;
        let nu = cuts_u as usize + 1;
        let nv = cuts_v as usize + 1;
        let point = |i: usize, j: usize| {
            let s = i as f32 / nu as f32;
            let t = j as f32 / nv as f32;
            corners[0].lerp(corners[1], s).lerp(corners[3].lerp(corners[2], s), t)
        };

        for j in 0..nv {
            for i in 0..nu {
                checked_points_normal(
                    &[point(i, j), point(i + 1, j), point(i + 1, j + 1), point(i, j + 1)],
                    "subdivide_face",
                )?;
            }
        }

        let mut grid = vec![vec![0 as VertexId; nv + 1]; nu + 1];
        grid[0][0] = source.vertices[0];
        grid[nu][0] = source.vertices[1];
        grid[nu][nv] = source.vertices[2];
        grid[0][nv] = source.vertices[3];
        for (i, column) in grid.iter_mut().enumerate() {
            for (j, slot) in column.iter_mut().enumerate() {
                let corner = (i == 0 || i == nu) && (j == 0 || j == nv);
                if !corner {
                    *slot = self.add_vertex(point(i, j));
                }
            }
        }

        // Boundary runs in loop order: v0->v1, v1->v2, v2->v3, v3->v0.
        let runs: [Vec<VertexId>; 4] = [
            (0..=nu).map(|i| grid[i][0]).collect(),
            (0..=nv).map(|j| grid[nu][j]).collect(),
            (0..=nu).rev().map(|i| grid[i][nv]).collect(),
            (0..=nv).rev().map(|j| grid[0][j]).collect(),
        ];

        self.remove_face(face)?;
        for run in &runs {
            if run.len() > 2 {
                self.split_neighbour_edge(run)?;
            }
        }

        let mut cells = Vec::with_capacity(nu * nv);
        for j in 0..nv {
            for i in 0..nu {
                let quad = vec![grid[i][j], grid[i + 1][j], grid[i + 1][j + 1], grid[i][j + 1]];
                cells.push(self.add_face(quad, source.material)?);
            }
        }
        Ok(cells)
    }

    /// Insert the interior vertices of `run` (ordered a..b) into the face
    /// that owns the opposite directed edge b->a, if any.
    fn split_neighbour_edge(&mut self, run: &[VertexId]) -> MeshResult<()> {
        let a = run[0];
        let b = run[run.len() - 1];
        let neighbour = self.faces().find_map(|(id, f)| {
            f.edges()
                .position(|(p, q)| p == b && q == a)
                .map(|k| (id, k))
        });
        let Some((id, k)) = neighbour else {
            return Ok(());
        };
        let mut vertices = self.face(id)?.vertices.clone();
        for (offset, &v) in run[1..run.len() - 1].iter().rev().enumerate() {
            vertices.insert(k + 1 + offset, v);
        }
        self.replace_loop(id, vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::primitives::BoxFace;
    use approx::assert_relative_eq;

    fn cube() -> (MeshModel, [FaceId; 6]) {
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::splat(0.5), Material::Hull).unwrap();
        (mesh, faces)
    }

    #[test]
    fn extrude_adds_cap_and_sides() {
        let (mut mesh, faces) = cube();
        let front = faces[BoxFace::PosX as usize];
        let ex = mesh.extrude_face(front, &ExtrudeParams::along_normal(1.0)).unwrap();
        assert_eq!(ex.sides.len(), 4);
        assert_eq!(mesh.face_count(), 6 - 1 + 5);
        assert_eq!(mesh.vertex_count(), 12);
        assert!(!mesh.contains_face(front));
        let c = mesh.face_center(ex.cap).unwrap();
        assert_relative_eq!(c.x, 1.5, epsilon = 1e-5);
        assert_relative_eq!(mesh.face_normal(ex.cap).unwrap().x, 1.0, epsilon = 1e-5);
        for side in &ex.sides {
            assert_relative_eq!(mesh.face_normal(*side).unwrap().x, 0.0, epsilon = 1e-5);
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn extrude_with_scale_tapers_cap() {
        let (mut mesh, faces) = cube();
        let params = ExtrudeParams::along_normal(0.5).with_uniform_scale(0.5);
        let ex = mesh.extrude_face(faces[BoxFace::PosX as usize], &params).unwrap();
        assert_relative_eq!(mesh.face_area(ex.cap).unwrap(), 0.25, epsilon = 1e-5);
    }

    #[test]
    fn zero_length_unscaled_extrude_is_degenerate() {
        let (mut mesh, faces) = cube();
        let before = mesh.clone();
        let err = mesh
            .extrude_face(faces[0], &ExtrudeParams::along_normal(0.0))
            .unwrap_err();
        assert!(matches!(err, MeshError::Degenerate { .. }));
        assert_eq!(mesh, before);
    }

    #[test]
    fn non_positive_scale_is_degenerate() {
        let (mut mesh, faces) = cube();
        let params = ExtrudeParams::along_normal(1.0).with_scale(Vec2::new(1.0, 0.0));
        assert!(mesh.extrude_face(faces[0], &params).is_err());
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn inset_keeps_face_in_plane() {
        let (mut mesh, faces) = cube();
        let top = faces[BoxFace::PosZ as usize];
        let ex = mesh.inset_face(top, 0.5).unwrap();
        assert_relative_eq!(mesh.face_area(ex.cap).unwrap(), 0.25, epsilon = 1e-5);
        assert_relative_eq!(mesh.face_center(ex.cap).unwrap().z, 0.5, epsilon = 1e-5);
        assert!(mesh.inset_face(ex.cap, 1.0).is_err());
    }

    #[test]
    fn subdivide_splits_neighbours_and_stays_closed() {
        let (mut mesh, faces) = cube();
        let cells = mesh.subdivide_face(faces[BoxFace::PosZ as usize], 2, 1).unwrap();
        assert_eq!(cells.len(), 6);
        let total: f32 = cells.iter().map(|c| mesh.face_area(*c).unwrap()).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-5);
        // each side face adjacent to the top now carries the extra edge vertices
        let side = mesh.face(faces[BoxFace::PosY as usize]).unwrap();
        assert_eq!(side.len(), 4 + 2);
        assert!(crate::adjacency::Adjacency::build(&mesh).is_closed_manifold());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn subdivide_rejects_triangles() {
        let mut mesh = MeshModel::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);
        let c = mesh.add_vertex(Vec3::Y);
        let f = mesh.add_face(vec![a, b, c], Material::Hull).unwrap();
        assert!(matches!(
            mesh.subdivide_face(f, 1, 1),
            Err(MeshError::NotAQuad { sides: 3, .. })
        ));
    }
}
