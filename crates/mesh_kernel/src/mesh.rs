//! Indexed polygon mesh: vertex positions plus ordered face loops.

use crate::error::{MeshError, MeshResult};
use crate::material::Material;
use crate::transform::Transform;
use glam::{Vec2, Vec3};

/// Index into the vertex array.
pub type VertexId = u32;

/// Smallest face area treated as non-degenerate.
pub const MIN_FACE_AREA: f32 = 1e-7;

/// Stable handle to a face. Ids stay valid until the face is removed or the
/// mesh is compacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A polygon: counter-clockwise vertex loop seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: Vec<VertexId>,
    /// Outward unit normal, refreshed whenever the kernel touches the face.
    pub normal: Vec3,
    pub material: Material,
}

impl Face {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Directed edges of the loop, in order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Orthonormal frame of a face: X along its first edge, Z along its normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    pub origin: Vec3,
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl FaceFrame {
    pub fn to_local(&self, p: Vec3) -> Vec3 {
        let d = p - self.origin;
        Vec3::new(d.dot(self.x), d.dot(self.y), d.dot(self.z))
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + self.x * local.x + self.y * local.y + self.z * local.z
    }

    pub fn transform(&self) -> Transform {
        Transform::from_axes(self.origin, self.x, self.y, self.z)
    }
}

/// Polygon mesh owned by one generation run.
///
/// Faces live in slots so that `FaceId`s handed out during generation remain
/// valid while other faces are added or removed. `compact` squeezes out dead
/// slots and unreferenced vertices at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshModel {
    positions: Vec<Vec3>,
    faces: Vec<Option<Face>>,
    live_faces: usize,
}

impl MeshModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of live faces.
    pub fn face_count(&self) -> usize {
        self.live_faces
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn position(&self, v: VertexId) -> MeshResult<Vec3> {
        self.positions
            .get(v as usize)
            .copied()
            .ok_or(MeshError::UnknownVertex(v))
    }

    pub(crate) fn set_position(&mut self, v: VertexId, p: Vec3) {
        self.positions[v as usize] = p;
    }

    pub fn face(&self, id: FaceId) -> MeshResult<&Face> {
        self.faces
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(MeshError::UnknownFace(id))
    }

    pub fn contains_face(&self, id: FaceId) -> bool {
        self.face(id).is_ok()
    }

    /// Live face ids in ascending order.
    pub fn face_ids(&self) -> Vec<FaceId> {
        self.faces()
            .map(|(id, _)| id)
            .collect()
    }

    /// Live faces in ascending id order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId(i as u32), f)))
    }

    pub fn add_vertex(&mut self, position: Vec3) -> VertexId {
        self.positions.push(position);
        (self.positions.len() - 1) as VertexId
    }

    /// Add a face after checking indices and area.
    pub fn add_face(&mut self, vertices: Vec<VertexId>, material: Material) -> MeshResult<FaceId> {
        for &v in &vertices {
            if v as usize >= self.positions.len() {
                return Err(MeshError::UnknownVertex(v));
            }
        }
        let normal = self.checked_normal(&vertices, "add_face")?;
        self.faces.push(Some(Face {
            vertices,
            normal,
            material,
        }));
        self.live_faces += 1;
        Ok(FaceId((self.faces.len() - 1) as u32))
    }

    pub fn remove_face(&mut self, id: FaceId) -> MeshResult<Face> {
        let face = self
            .faces
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(MeshError::UnknownFace(id))?;
        self.live_faces -= 1;
        Ok(face)
    }

    /// Replace a face's loop in place, keeping its id and material.
    pub(crate) fn replace_loop(&mut self, id: FaceId, vertices: Vec<VertexId>) -> MeshResult<()> {
        let normal = self.checked_normal(&vertices, "replace_loop")?;
        let face = self
            .faces
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::UnknownFace(id))?;
        face.vertices = vertices;
        face.normal = normal;
        Ok(())
    }

    pub fn set_material(&mut self, id: FaceId, material: Material) -> MeshResult<()> {
        let face = self
            .faces
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::UnknownFace(id))?;
        face.material = material;
        Ok(())
    }

    pub fn face_positions(&self, id: FaceId) -> MeshResult<Vec<Vec3>> {
        Ok(self
            .face(id)?
            .vertices
            .iter()
            .map(|&v| self.positions[v as usize])
            .collect())
    }

    /// Outward unit normal recomputed from current vertex positions.
    pub fn face_normal(&self, id: FaceId) -> MeshResult<Vec3> {
        let points = self.face_positions(id)?;
        Ok(newell(&points).normalize_or_zero())
    }

    pub fn face_area(&self, id: FaceId) -> MeshResult<f32> {
        Ok(polygon_area(&self.face_positions(id)?))
    }

    /// Vertex average of the face.
    pub fn face_centroid(&self, id: FaceId) -> MeshResult<Vec3> {
        Ok(centroid(&self.face_positions(id)?))
    }

    /// Centre of the face's axis-aligned bounds.
    pub fn face_center(&self, id: FaceId) -> MeshResult<Vec3> {
        let points = self.face_positions(id)?;
        let (min, max) = points.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        Ok((min + max) * 0.5)
    }

    /// Frame centred on the face bounds, X along the first edge.
    pub fn face_frame(&self, id: FaceId) -> MeshResult<FaceFrame> {
        let points = self.face_positions(id)?;
        let z = newell(&points).normalize_or_zero();
        if z == Vec3::ZERO {
            return Err(MeshError::Degenerate {
                operation: "face_frame",
                reason: "face has no normal",
            });
        }
        let edge = points[1] - points[0];
        let x = (edge - z * edge.dot(z)).try_normalize().unwrap_or_else(|| z.any_orthonormal_vector());
        let y = z.cross(x);
        Ok(FaceFrame {
            origin: self.face_center(id)?,
            x,
            y,
            z,
        })
    }

    /// Extent of the face along its frame's X and Y axes.
    ///
    /// For rectangles this is the (first edge, second edge) length pair.
    pub fn face_extents(&self, id: FaceId) -> MeshResult<Vec2> {
        let frame = self.face_frame(id)?;
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for p in self.face_positions(id)? {
            let local = frame.to_local(p);
            min = min.min(local.truncate());
            max = max.max(local.truncate());
        }
        Ok(max - min)
    }

    /// Rough aspect ratio of the face, always >= 1.
    pub fn face_aspect_ratio(&self, id: FaceId) -> MeshResult<f32> {
        let extents = self.face_extents(id)?;
        let lo = extents.min_element().max(1e-6);
        Ok(extents.max_element() / lo)
    }

    /// Refresh every cached face normal from current positions.
    pub fn recompute_normals(&mut self) {
        let positions = &self.positions;
        for face in self.faces.iter_mut().flatten() {
            let points: Vec<Vec3> = face.vertices.iter().map(|&v| positions[v as usize]).collect();
            face.normal = newell(&points).normalize_or_zero();
        }
    }

    /// Normal of a prospective loop, or `Degenerate` if it has fewer than
    /// three distinct vertices or no area.
    pub(crate) fn checked_normal(&self, vertices: &[VertexId], operation: &'static str) -> MeshResult<Vec3> {
        if distinct_count(vertices) < 3 {
            return Err(MeshError::Degenerate {
                operation,
                reason: "fewer than three distinct vertices",
            });
        }
        let points: Vec<Vec3> = vertices.iter().map(|&v| self.positions[v as usize]).collect();
        checked_points_normal(&points, operation)
    }

    /// Check the no-degenerate-face and no-orphan-vertex invariants.
    pub fn validate(&self) -> MeshResult<()> {
        let mut referenced = vec![false; self.positions.len()];
        for (id, face) in self.faces() {
            for &v in &face.vertices {
                let slot = referenced.get_mut(v as usize).ok_or(MeshError::UnknownVertex(v))?;
                *slot = true;
            }
            if distinct_count(&face.vertices) < 3 {
                return Err(MeshError::Degenerate {
                    operation: "validate",
                    reason: "fewer than three distinct vertices",
                });
            }
            if self.face_area(id)? <= MIN_FACE_AREA {
                return Err(MeshError::Degenerate {
                    operation: "validate",
                    reason: "zero area face",
                });
            }
        }
        if let Some(orphan) = referenced.iter().position(|r| !r) {
            return Err(MeshError::OrphanVertex(orphan as VertexId));
        }
        Ok(())
    }

    /// Drop dead face slots and unreferenced vertices. All `FaceId`s and
    /// vertex indices are renumbered in ascending order of their old values.
    pub fn compact(&mut self) {
        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut positions = Vec::with_capacity(self.positions.len());
        let mut faces = Vec::with_capacity(self.live_faces);
        for mut face in self.faces.drain(..).flatten() {
            for v in face.vertices.iter_mut() {
                let slot = &mut remap[*v as usize];
                if *slot == u32::MAX {
                    *slot = positions.len() as u32;
                    positions.push(self.positions[*v as usize]);
                }
                *v = *slot;
            }
            faces.push(Some(face));
        }
        log::trace!(
            "compact: {} -> {} vertices, {} faces",
            self.positions.len(),
            positions.len(),
            faces.len()
        );
        self.positions = positions;
        self.live_faces = faces.len();
        self.faces = faces;
    }

    /// Run `f` as a transaction: on error the mesh is restored to its state
    /// before the call.
    pub fn try_apply<T>(&mut self, f: impl FnOnce(&mut Self) -> MeshResult<T>) -> MeshResult<T> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    /// Apply `f` to every vertex position.
    pub fn map_positions(&mut self, f: impl Fn(Vec3) -> Vec3) {
        for p in self.positions.iter_mut() {
            *p = f(*p);
        }
        self.recompute_normals();
    }
}

/// Newell normal of a polygon; its length is twice the polygon area.
pub fn newell(points: &[Vec3]) -> Vec3 {
    if points.len() < 3 {
        return Vec3::ZERO;
    }
    let c = centroid(points);
    let n = points.len();
    (0..n).fold(Vec3::ZERO, |acc, i| {
        acc + (points[i] - c).cross(points[(i + 1) % n] - c)
    })
}

pub fn polygon_area(points: &[Vec3]) -> f32 {
    newell(points).length() * 0.5
}

pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

pub(crate) fn checked_points_normal(points: &[Vec3], operation: &'static str) -> MeshResult<Vec3> {
    let n = newell(points);
    if !n.is_finite() || n.length() * 0.5 <= MIN_FACE_AREA {
        return Err(MeshError::Degenerate {
            operation,
            reason: "zero area face",
        });
    }
    Ok(n.normalize())
}

fn distinct_count(vertices: &[VertexId]) -> usize {
    let mut sorted = vertices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square(mesh: &mut MeshModel) -> FaceId {
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(2.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(2.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        mesh.add_face(vec![a, b, c, d], Material::Hull).unwrap()
    }

    #[test]
    fn square_face_queries() {
        let mut mesh = MeshModel::new();
        let f = unit_square(&mut mesh);
        assert_relative_eq!(mesh.face_area(f).unwrap(), 2.0, epsilon = 1e-5);
        assert_relative_eq!(mesh.face_normal(f).unwrap().z, 1.0, epsilon = 1e-5);
        let extents = mesh.face_extents(f).unwrap();
        assert_relative_eq!(extents.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(extents.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(mesh.face_aspect_ratio(f).unwrap(), 2.0, epsilon = 1e-4);
        let frame = mesh.face_frame(f).unwrap();
        assert_relative_eq!(frame.x.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(frame.origin.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn add_face_rejects_collinear_loop() {
        let mut mesh = MeshModel::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);
        let c = mesh.add_vertex(Vec3::X * 2.0);
        let err = mesh.add_face(vec![a, b, c], Material::Hull).unwrap_err();
        assert!(matches!(err, MeshError::Degenerate { .. }));
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn add_face_rejects_repeated_vertices() {
        let mut mesh = MeshModel::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);
        assert!(mesh.add_face(vec![a, b, a], Material::Hull).is_err());
        assert!(matches!(
            mesh.add_face(vec![a, b, 7], Material::Hull),
            Err(MeshError::UnknownVertex(7))
        ));
    }

    #[test]
    fn validate_reports_orphans() {
        let mut mesh = MeshModel::new();
        unit_square(&mut mesh);
        assert!(mesh.validate().is_ok());
        mesh.add_vertex(Vec3::splat(9.0));
        assert_eq!(mesh.validate(), Err(MeshError::OrphanVertex(4)));
    }

    #[test]
    fn compact_drops_dead_faces_and_orphans() {
        let mut mesh = MeshModel::new();
        let f = unit_square(&mut mesh);
        let g = unit_square(&mut mesh);
        mesh.remove_face(f).unwrap();
        mesh.compact();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.contains_face(FaceId(0)));
        assert!(!mesh.contains_face(g));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn try_apply_restores_on_error() {
        let mut mesh = MeshModel::new();
        let f = unit_square(&mut mesh);
        let before = mesh.clone();
        let result: MeshResult<()> = mesh.try_apply(|m| {
            m.remove_face(f)?;
            m.add_vertex(Vec3::ONE);
            Err(MeshError::EmptyHalf)
        });
        assert!(result.is_err());
        assert_eq!(mesh, before);
    }
}
