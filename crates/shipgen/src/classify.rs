//! Orientation buckets for detail placement.
//!
//! Axes: +X forward, +Z up, +Y left.

use mesh_kernel::{FaceId, MeshModel};
use glam::Vec3;

/// Components closer than this to the largest one count as tied.
pub const TIE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Forward,
    Aft,
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    pub const ALL: [Orientation; 6] = [
        Orientation::Forward,
        Orientation::Aft,
        Orientation::Up,
        Orientation::Down,
        Orientation::Left,
        Orientation::Right,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Bucket of an outward normal by its dominant component. Ties resolve
    /// forward/aft first, then up/down, then left/right. `None` for a zero
    /// or non-finite normal.
    pub fn from_normal(normal: Vec3) -> Option<Self> {
        let n = normal.try_normalize()?;
        let largest = n.abs().max_element();
        if n.x.abs() >= largest - TIE_EPSILON {
            Some(if n.x >= 0.0 { Orientation::Forward } else { Orientation::Aft })
        } else if n.z.abs() >= largest - TIE_EPSILON {
            Some(if n.z >= 0.0 { Orientation::Up } else { Orientation::Down })
        } else {
            Some(if n.y >= 0.0 { Orientation::Left } else { Orientation::Right })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedFace {
    pub id: FaceId,
    pub orientation: Orientation,
    /// Normal points away from the origin (the face is on the ship's skin
    /// rather than in a recess).
    pub outward: bool,
    pub aspect: f32,
    pub center: Vec3,
}

/// Faces grouped by orientation, each bucket in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct FaceClassification {
    buckets: [Vec<ClassifiedFace>; 6],
}

impl FaceClassification {
    pub fn bucket(&self, orientation: Orientation) -> &[ClassifiedFace] {
        &self.buckets[orientation.index()]
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedFace> + '_ {
        self.buckets.iter().flatten()
    }
}

/// Pure classification of the current face set.
pub struct FaceClassifier;

impl FaceClassifier {
    pub fn classify(mesh: &MeshModel) -> FaceClassification {
        let mut out = FaceClassification::default();
        for (id, _) in mesh.faces() {
            let Ok(normal) = mesh.face_normal(id) else {
                continue;
            };
            let Some(orientation) = Orientation::from_normal(normal) else {
                continue;
            };
            let (Ok(center), Ok(aspect)) = (mesh.face_center(id), mesh.face_aspect_ratio(id)) else {
                continue;
            };
            out.buckets[orientation.index()].push(ClassifiedFace {
                id,
                orientation,
                outward: normal.dot(center) > 0.0,
                aspect,
                center,
            });
        }
        log::debug!(
            "classify: {}",
            Orientation::ALL
                .iter()
                .map(|o| format!("{o:?}={}", out.bucket(*o).len()))
                .collect::<Vec<_>>()
                .join(" ")
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_kernel::{BoxFace, Material};

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(Orientation::from_normal(Vec3::new(0.9, 0.3, 0.1)), Some(Orientation::Forward));
        assert_eq!(Orientation::from_normal(Vec3::new(-0.2, 0.1, -0.9)), Some(Orientation::Down));
        assert_eq!(Orientation::from_normal(Vec3::new(0.1, -0.8, 0.3)), Some(Orientation::Right));
        assert_eq!(Orientation::from_normal(Vec3::ZERO), None);
    }

    #[test]
    fn ties_follow_axis_priority() {
        assert_eq!(Orientation::from_normal(Vec3::new(1.0, 1.0, 1.0)), Some(Orientation::Forward));
        assert_eq!(Orientation::from_normal(Vec3::new(0.0, 1.0, -1.0)), Some(Orientation::Down));
        assert_eq!(Orientation::from_normal(Vec3::new(-1.0, -1.0, 0.0)), Some(Orientation::Aft));
    }

    #[test]
    fn box_faces_fill_every_bucket() {
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::new(1.0, 0.5, 0.25), Material::Hull).unwrap();
        let classes = FaceClassifier::classify(&mesh);
        assert_eq!(classes.len(), 6);
        for orientation in Orientation::ALL {
            let bucket = classes.bucket(orientation);
            assert_eq!(bucket.len(), 1);
            assert!(bucket[0].outward);
        }
        assert_eq!(classes.bucket(Orientation::Left)[0].id, faces[BoxFace::PosY as usize]);
        assert_eq!(classes.bucket(Orientation::Up)[0].id, faces[BoxFace::PosZ as usize]);
        assert!((classes.bucket(Orientation::Forward)[0].aspect - 2.0).abs() < 1e-4);
    }
}
