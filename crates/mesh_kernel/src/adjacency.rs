//! Adjacency indices: vertex -> faces, directed edge -> face, face -> neighbours.

use crate::mesh::{FaceId, MeshModel, VertexId};
use std::collections::HashMap;

/// Snapshot of mesh connectivity. Rebuild after mutating the mesh.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    vertex_faces: Vec<Vec<FaceId>>,
    half_edges: HashMap<(VertexId, VertexId), FaceId>,
    duplicate_half_edges: usize,
}

impl Adjacency {
    pub fn build(mesh: &MeshModel) -> Self {
        let mut vertex_faces = vec![Vec::new(); mesh.vertex_count()];
        let mut half_edges = HashMap::new();
        let mut duplicate_half_edges = 0;
        for (id, face) in mesh.faces() {
            for &v in &face.vertices {
                let list: &mut Vec<FaceId> = &mut vertex_faces[v as usize];
                if list.last() != Some(&id) {
                    list.push(id);
                }
            }
            for edge in face.edges() {
                if half_edges.insert(edge, id).is_some() {
                    duplicate_half_edges += 1;
                }
            }
        }
        Self {
            vertex_faces,
            half_edges,
            duplicate_half_edges,
        }
    }

    /// Faces using `v`, in ascending id order.
    pub fn faces_around(&self, v: VertexId) -> &[FaceId] {
        self.vertex_faces.get(v as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Face owning the directed edge `a -> b`.
    pub fn edge_face(&self, a: VertexId, b: VertexId) -> Option<FaceId> {
        self.half_edges.get(&(a, b)).copied()
    }

    /// Faces sharing an edge with `face`, sorted and deduplicated.
    pub fn neighbours(&self, mesh: &MeshModel, face: FaceId) -> Vec<FaceId> {
        let Ok(f) = mesh.face(face) else {
            return Vec::new();
        };
        let mut out: Vec<FaceId> = f
            .edges()
            .filter_map(|(a, b)| self.edge_face(b, a))
            .filter(|&n| n != face)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Number of directed edges with no opposite twin.
    pub fn boundary_edge_count(&self) -> usize {
        self.half_edges
            .keys()
            .filter(|(a, b)| !self.half_edges.contains_key(&(*b, *a)))
            .count()
    }

    /// Every directed edge appears once and has an opposite twin.
    pub fn is_closed_manifold(&self) -> bool {
        self.duplicate_half_edges == 0 && self.boundary_edge_count() == 0
    }

    /// Faces around `v` in counter-clockwise order seen from outside,
    /// starting at its lowest face id. `None` if the fan is open or does not
    /// cover every face using `v` (a non-manifold vertex).
    pub fn fan(&self, mesh: &MeshModel, v: VertexId) -> Option<Vec<FaceId>> {
        let around = self.faces_around(v);
        let start = *around.first()?;
        let mut fan = Vec::with_capacity(around.len());
        let mut current = start;
        loop {
            fan.push(current);
            let face = mesh.face(current).ok()?;
            let k = face.vertices.iter().position(|&x| x == v)?;
            let n = face.vertices.len();
            let prev = face.vertices[(k + n - 1) % n];
            current = self.edge_face(v, prev)?;
            if current == start {
                break;
            }
            if fan.len() > around.len() {
                return None;
            }
        }
        let mut sorted = fan.clone();
        sorted.sort_unstable();
        sorted.dedup();
        (sorted.len() == fan.len() && sorted.as_slice() == around).then_some(fan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use glam::Vec3;

    #[test]
    fn box_neighbours_and_fans() {
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::ONE, Material::Hull).unwrap();
        let adj = Adjacency::build(&mesh);
        assert!(adj.is_closed_manifold());
        assert_eq!(adj.neighbours(&mesh, faces[0]).len(), 4);
        for v in 0..8 {
            let fan = adj.fan(&mesh, v).unwrap();
            assert_eq!(fan.len(), 3);
        }
    }

    #[test]
    fn open_surface_is_not_closed() {
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::ONE, Material::Hull).unwrap();
        mesh.remove_face(faces[2]).unwrap();
        let adj = Adjacency::build(&mesh);
        assert!(!adj.is_closed_manifold());
        assert_eq!(adj.boundary_edge_count(), 4);
        assert!(adj.fan(&mesh, 3).is_none());
    }
}
