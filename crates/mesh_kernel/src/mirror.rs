//! Plane bisection, reflection and seam welding for axis-aligned mirror
//! planes through the origin.

use crate::adjacency::Adjacency;
use crate::error::{MeshError, MeshResult};
use crate::mesh::{FaceId, MeshModel, VertexId, MIN_FACE_AREA};
use glam::Vec3;
use std::collections::HashMap;

/// Snap distance for near-plane vertices, as a multiple of the weld epsilon.
const SNAP_SCALE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Reflect `p` across the plane `axis = 0`.
    pub fn reflect(self, mut p: Vec3) -> Vec3 {
        p[self.index()] = -p[self.index()];
        p
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Faces cut by the plane and trimmed to the kept side.
    pub clipped_faces: usize,
    /// Faces on the discarded side or lying in the plane.
    pub removed_faces: usize,
    pub welded_vertices: usize,
}

impl MeshModel {
    /// Keep the half with `axis >= 0`, reflect it onto the other side and
    /// weld the seam.
    ///
    /// Vertices within `SNAP_SCALE * weld_epsilon` of the plane are snapped
    /// onto it first.
    /// Fails with `EmptyHalf` if nothing is left on the kept side,
    /// `DuplicateFace` if the result contains the same face twice, and
    /// `OpenSeam` if a closed input would come out with boundary edges. The
    /// mesh is compacted on success and untouched on error.
    pub fn bisect_and_mirror(&mut self, axis: Axis, weld_epsilon: f32) -> MeshResult<MirrorReport> {
        let was_closed = Adjacency::build(self).is_closed_manifold();
        self.try_apply(|mesh| {
            let mut report = MirrorReport::default();
            let kept = mesh.bisect(axis, weld_epsilon * SNAP_SCALE, &mut report)?;
            if kept.is_empty() {
                return Err(MeshError::EmptyHalf);
            }
            mesh.reflect_faces(axis, &kept)?;
            report.welded_vertices = mesh.weld_on_plane(axis, weld_epsilon)?;
            mesh.compact();

            if let Some(dup) = mesh.first_duplicate_face() {
                return Err(MeshError::DuplicateFace(dup));
            }
            if was_closed {
                let adjacency = Adjacency::build(mesh);
                if !adjacency.is_closed_manifold() {
                    return Err(MeshError::OpenSeam(adjacency.boundary_edge_count()));
                }
            }
            log::trace!("mirror {axis:?}: {report:?}");
            Ok(report)
        })
    }

    /// Trim every face to the `axis >= 0` half. Returns the surviving faces.
    fn bisect(&mut self, axis: Axis, snap: f32, report: &mut MirrorReport) -> MeshResult<Vec<FaceId>> {
        let k = axis.index();
        let mut snapped = false;
        for v in 0..self.vertex_count() as VertexId {
            let mut p = self.position(v)?;
            if p[k] != 0.0 && p[k].abs() < snap {
                p[k] = 0.0;
                self.set_position(v, p);
                snapped = true;
            }
        }
        if snapped {
            self.recompute_normals();
        }

        let mut cut_vertices: HashMap<(VertexId, VertexId), VertexId> = HashMap::new();
        let mut kept = Vec::new();
        for id in self.face_ids() {
            let loop_ = self.face(id)?.vertices.clone();
            let d: Vec<f32> = loop_
                .iter()
                .map(|&v| self.position(v).map(|p| p[k]))
                .collect::<MeshResult<_>>()?;

            if d.iter().all(|&x| x <= 0.0) {
                self.remove_face(id)?;
                report.removed_faces += 1;
                continue;
            }
            if d.iter().all(|&x| x >= 0.0) {
                if self.face_area(id)? > MIN_FACE_AREA {
                    kept.push(id);
                } else {
                    self.remove_face(id)?;
                    report.removed_faces += 1;
                }
                continue;
            }

            let n = loop_.len();
            let mut clipped = Vec::with_capacity(n + 2);
            for i in 0..n {
                let j = (i + 1) % n;
                let (a, b) = (loop_[i], loop_[j]);
                if d[i] >= 0.0 {
                    clipped.push(a);
                }
                if (d[i] > 0.0 && d[j] < 0.0) || (d[i] < 0.0 && d[j] > 0.0) {
                    let key = (a.min(b), a.max(b));
                    let v = match cut_vertices.get(&key) {
                        Some(&v) => v,
                        None => {
                            let (pa, pb) = (self.position(a)?, self.position(b)?);
                            let t = d[i] / (d[i] - d[j]);
                            let mut p = pa.lerp(pb, t);
                            p[k] = 0.0;
                            let v = self.add_vertex(p);
                            cut_vertices.insert(key, v);
                            v
                        }
                    };
                    clipped.push(v);
                }
            }
            clipped.dedup();
            if clipped.len() > 1 && clipped.first() == clipped.last() {
                clipped.pop();
            }
            report.clipped_faces += 1;
            match self.replace_loop(id, clipped) {
                Ok(()) => kept.push(id),
                Err(MeshError::Degenerate { .. }) => {
                    self.remove_face(id)?;
                    report.removed_faces += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(kept)
    }

    /// Add a reversed reflected copy of every face in `faces`. Vertices on
    /// the plane are shared between a face and its reflection.
    fn reflect_faces(&mut self, axis: Axis, faces: &[FaceId]) -> MeshResult<()> {
        let k = axis.index();
        let mut reflected: Vec<Option<VertexId>> = vec![None; self.vertex_count()];
        for &id in faces {
            let face = self.face(id)?.clone();
            let mut loop_ = Vec::with_capacity(face.len());
            for &v in face.vertices.iter().rev() {
                let p = self.position(v)?;
                let image = if p[k] == 0.0 {
                    v
                } else if let Some(image) = reflected[v as usize] {
                    image
                } else {
                    let image = self.add_vertex(axis.reflect(p));
                    reflected[v as usize] = Some(image);
                    image
                };
                loop_.push(image);
            }
            self.add_face(loop_, face.material)?;
        }
        Ok(())
    }

    /// Merge distinct vertices lying on the plane `axis = 0` that are within
    /// `epsilon` of each other. Returns the number of vertices merged away.
    pub fn weld_on_plane(&mut self, axis: Axis, epsilon: f32) -> MeshResult<usize> {
        let k = axis.index();
        let (u, w) = ((k + 1) % 3, (k + 2) % 3);
        let cell = |p: Vec3| {
            (
                (p[u] / epsilon).floor() as i64,
                (p[w] / epsilon).floor() as i64,
            )
        };

        let mut buckets: HashMap<(i64, i64), Vec<VertexId>> = HashMap::new();
        let mut remap: Vec<VertexId> = (0..self.vertex_count() as VertexId).collect();
        let mut welded = 0;
        for v in 0..self.vertex_count() as VertexId {
            let p = self.position(v)?;
            if p[k] != 0.0 {
                continue;
            }
            let (cu, cw) = cell(p);
            let mut target = None;
            'search: for du in -1..=1 {
                for dw in -1..=1 {
                    let Some(bucket) = buckets.get(&(cu + du, cw + dw)) else {
                        continue;
                    };
                    for &other in bucket {
                        if self.position(other)?.distance(p) <= epsilon {
                            target = Some(other);
                            break 'search;
                        }
                    }
                }
            }
            match target {
                Some(other) => {
                    remap[v as usize] = other;
                    welded += 1;
                }
                None => buckets.entry((cu, cw)).or_default().push(v),
            }
        }
        if welded == 0 {
            return Ok(0);
        }

        for id in self.face_ids() {
            let face = self.face(id)?;
            let mut loop_: Vec<VertexId> = face.vertices.iter().map(|&v| remap[v as usize]).collect();
            if loop_ == face.vertices {
                continue;
            }
            loop_.dedup();
            if loop_.len() > 1 && loop_.first() == loop_.last() {
                loop_.pop();
            }
            if self.replace_loop(id, loop_).is_err() {
                self.remove_face(id)?;
            }
        }
        Ok(welded)
    }

    /// First face (by id) whose vertex set repeats an earlier face's.
    fn first_duplicate_face(&self) -> Option<FaceId> {
        let mut seen: HashMap<Vec<VertexId>, FaceId> = HashMap::new();
        for (id, face) in self.faces() {
            let mut key = face.vertices.clone();
            key.sort_unstable();
            if seen.insert(key, id).is_some() {
                return Some(id);
            }
        }
        None
    }
}

/// Whether every face centroid has a reflected partner across `axis`
/// within `epsilon`.
pub fn is_mirror_symmetric(mesh: &MeshModel, axis: Axis, epsilon: f32) -> bool {
    let key = |p: Vec3| (p / epsilon).floor().as_ivec3();
    let mut grid: HashMap<glam::IVec3, Vec<Vec3>> = HashMap::new();
    let mut centroids = Vec::with_capacity(mesh.face_count());
    for id in mesh.face_ids() {
        let Ok(c) = mesh.face_centroid(id) else {
            return false;
        };
        grid.entry(key(c)).or_default().push(c);
        centroids.push(c);
    }
    centroids.iter().all(|c| {
        let image = axis.reflect(*c);
        let cell = key(image);
        (-1..=1).any(|dx| {
            (-1..=1).any(|dy| {
                (-1..=1).any(|dz| {
                    grid.get(&(cell + glam::IVec3::new(dx, dy, dz)))
                        .is_some_and(|bucket| bucket.iter().any(|o| o.distance(image) <= epsilon))
                })
            })
        })
    })
}
