//! Chamfer bevel over a closed 2-manifold.
//!
//! Each pass shrinks every face toward its centroid, turns every edge into a
//! quad between the two shrunk faces, and closes every vertex with a polygon
//! through the shrunk corners around it. Vertices shared by only two faces
//! need no polygon: their two edge quads already meet.

use crate::adjacency::Adjacency;
use crate::error::{MeshError, MeshResult};
use crate::material::Material;
use crate::mesh::{centroid, polygon_area, FaceId, MeshModel, VertexId, MIN_FACE_AREA};
use glam::Vec3;
use std::collections::HashMap;

/// Corners never move more than this fraction of the way to the centroid.
const MAX_CORNER_TRAVEL: f32 = 0.45;

/// A shrunk face keeps at least this multiple of `MIN_FACE_AREA`.
const SHRUNK_AREA_FLOOR: f32 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BevelReport {
    pub passes: u32,
    pub edge_faces: usize,
    pub vertex_faces: usize,
}

impl MeshModel {
    /// Chamfer every edge `segments` times, halving the width each pass.
    ///
    /// The mesh is compacted afterwards, so previously issued `FaceId`s are
    /// invalidated. On error the mesh is left untouched.
    pub fn bevel(&mut self, width: f32, segments: u32) -> MeshResult<BevelReport> {
        if !(width > 0.0) || !width.is_finite() || segments == 0 {
            return Err(MeshError::Degenerate {
                operation: "bevel",
                reason: "non-positive width or zero segments",
            });
        }
        self.try_apply(|mesh| {
            let mut report = BevelReport::default();
            let mut w = width;
            for _ in 0..segments {
                let (edges, vertices) = mesh.chamfer_pass(w)?;
                report.passes += 1;
                report.edge_faces += edges;
                report.vertex_faces += vertices;
                w *= 0.5;
            }
            Ok(report)
        })
    }

    fn chamfer_pass(&mut self, width: f32) -> MeshResult<(usize, usize)> {
        let adjacency = Adjacency::build(self);
        if !adjacency.is_closed_manifold() {
            return Err(MeshError::NonManifold(format!(
                "{} boundary edges",
                adjacency.boundary_edge_count()
            )));
        }
        let mut fans = Vec::with_capacity(self.vertex_count());
        for v in 0..self.vertex_count() as VertexId {
            if adjacency.faces_around(v).is_empty() {
                fans.push(Vec::new());
                continue;
            }
            let fan = adjacency
                .fan(self, v)
                .ok_or_else(|| MeshError::NonManifold(format!("vertex {v} has a split fan")))?;
            fans.push(fan);
        }

        let face_ids = self.face_ids();
        let mut corners: HashMap<(FaceId, VertexId), VertexId> = HashMap::new();
        let mut original: HashMap<FaceId, Vec<VertexId>> = HashMap::new();
        for &id in &face_ids {
            let loop_ = self.face(id)?.vertices.clone();
            let points = self.face_positions(id)?;
            let mut shrunk = Vec::with_capacity(loop_.len());
            for (&v, p) in loop_.iter().zip(shrink(&points, width)) {
                let corner = self.add_vertex(p);
                corners.insert((id, v), corner);
                shrunk.push(corner);
            }
            self.replace_loop(id, shrunk)?;
            original.insert(id, loop_);
        }

        let corner = |face: FaceId, v: VertexId| {
            corners
                .get(&(face, v))
                .copied()
                .ok_or_else(|| MeshError::NonManifold(format!("no corner for vertex {v}")))
        };

        let mut edge_faces = 0;
        for &f in &face_ids {
            let material_f = self.face(f)?.material;
            let loop_ = &original[&f];
            let n = loop_.len();
            for i in 0..n {
                let (a, b) = (loop_[i], loop_[(i + 1) % n]);
                let g = adjacency
                    .edge_face(b, a)
                    .ok_or_else(|| MeshError::NonManifold(format!("edge {a}-{b} has no twin")))?;
                if f >= g {
                    continue;
                }
                let material = Material::blend([material_f, self.face(g)?.material]);
                let quad = vec![corner(f, b)?, corner(f, a)?, corner(g, a)?, corner(g, b)?];
                self.add_face(quad, material)?;
                edge_faces += 1;
            }
        }

        let mut vertex_faces = 0;
        for (v, fan) in fans.iter().enumerate() {
            if fan.len() < 3 {
                continue;
            }
            let v = v as VertexId;
            let ring = fan.iter().map(|&f| corner(f, v)).collect::<MeshResult<Vec<_>>>()?;
            let materials = fan
                .iter()
                .map(|&f| self.face(f).map(|face| face.material))
                .collect::<MeshResult<Vec<_>>>()?;
            self.add_face(ring, Material::blend(materials))?;
            vertex_faces += 1;
        }

        self.compact();
        log::trace!("chamfer: {edge_faces} edge faces, {vertex_faces} vertex faces");
        Ok((edge_faces, vertex_faces))
    }
}

/// Move every corner of a face toward its centroid by `width`, clamped.
/// Thin faces that would drop below the area floor shrink uniformly instead,
/// only as far as the floor allows.
fn shrink(points: &[Vec3], width: f32) -> Vec<Vec3> {
    let c = centroid(points);
    let moved: Vec<Vec3> = points
        .iter()
        .map(|&p| {
            let to_centre = c - p;
            p + to_centre.normalize_or_zero() * width.min(to_centre.length() * MAX_CORNER_TRAVEL)
        })
        .collect();
    let floor = MIN_FACE_AREA * SHRUNK_AREA_FLOOR;
    if polygon_area(&moved) > floor {
        return moved;
    }
    let keep = (floor / polygon_area(points)).sqrt();
    let t = (1.0 - keep).clamp(0.0, MAX_CORNER_TRAVEL);
    points.iter().map(|&p| p.lerp(c, t)).collect()
}
