//! Off-axis protrusions that break the hull's mirror symmetry.

use crate::config::ShipConfig;
use crate::error::GenerateError;
use crate::hull::HullSegment;
use crate::retry::{with_retries, Attempt};
use crate::seed::SeedContext;
use mesh_kernel::{ExtrudeParams, Extrusion, FaceId, MeshError, MeshModel};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsymmetryReport {
    pub requested: u32,
    pub extrusions: u32,
    pub regions: u32,
    pub resamples: u32,
    /// Stopped before `requested` because no usable face was left.
    pub ended_early: bool,
}

/// Protrusion a face belongs to and how many extrusions deep it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lineage {
    region: u32,
    depth: u32,
}

#[derive(Debug)]
enum Rejection {
    NoCandidate,
    AtMaxDepth,
    Mesh(MeshError),
}

struct Protrusion {
    face: FaceId,
    lineage: Lineage,
    extrusion: Extrusion,
}

pub struct AsymmetryPass<'a> {
    config: &'a ShipConfig,
}

impl<'a> AsymmetryPass<'a> {
    pub fn new(config: &'a ShipConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        mesh: &mut MeshModel,
        ctx: &mut SeedContext,
        hull: &mut HullSegment,
    ) -> Result<AsymmetryReport, GenerateError> {
        let mut report = AsymmetryReport::default();
        if !self.config.create_asymmetry_segments {
            return Ok(report);
        }
        report.requested = ctx.range_u32(
            self.config.num_asymmetry_segments_min,
            self.config.num_asymmetry_segments_max,
        );

        let mut lineage: HashMap<FaceId, Lineage> = HashMap::new();
        let mut region_hits: Vec<u32> = Vec::new();

        for segment in 0..report.requested {
            let attempt = with_retries(self.config.retry_budget, |_| {
                self.protrude(mesh, ctx, &lineage, &region_hits)
            });
            report.resamples += attempt.retries();
            let protrusion = match attempt {
                Attempt::Succeeded(p) | Attempt::Resampled { value: p, .. } => p,
                Attempt::Abandoned { retries, last: Rejection::Mesh(e) } => {
                    log::debug!("asymmetry: segment {segment} stayed degenerate: {e}");
                    return Err(GenerateError::HullGeneration {
                        stage: "asymmetry",
                        retries,
                    });
                }
                Attempt::Abandoned { last, .. } => {
                    log::debug!("asymmetry: stopping after {segment} segments ({last:?})");
                    report.ended_early = true;
                    break;
                }
            };

            let Protrusion { face, lineage: from, extrusion } = protrusion;
            if from.region as usize == region_hits.len() {
                region_hits.push(0);
                report.regions += 1;
            }
            region_hits[from.region as usize] += 1;
            let child = Lineage {
                region: from.region,
                depth: from.depth + 1,
            };
            lineage.remove(&face);
            for id in std::iter::once(extrusion.cap).chain(extrusion.sides.iter().copied()) {
                lineage.insert(id, child);
            }
            hull.follow(face, extrusion.cap);
            report.extrusions += 1;
        }

        log::debug!("asymmetry: {report:?}");
        Ok(report)
    }

    /// Draw a face and extrusion parameters and apply them.
    fn protrude(
        &self,
        mesh: &mut MeshModel,
        ctx: &mut SeedContext,
        lineage: &HashMap<FaceId, Lineage>,
        region_hits: &[u32],
    ) -> Result<Protrusion, Rejection> {
        let candidates = self.candidates(mesh);
        let face = ctx.choose_weighted(&candidates).ok_or(Rejection::NoCandidate)?;
        let from = lineage.get(&face).copied().unwrap_or(Lineage {
            region: region_hits.len() as u32,
            depth: 0,
        });
        if from.depth >= self.config.max_asymmetry_depth {
            return Err(Rejection::AtMaxDepth);
        }

        let hits = region_hits.get(from.region as usize).copied().unwrap_or(0);
        let decay = self.config.asymmetry_decay.powi(hits as i32);
        let length = ctx.range_f32(0.1, 0.4) * decay;
        let mut scale = decay;
        if ctx.chance(0.75) {
            scale /= ctx.range_f32(1.1, 1.5);
        }
        let params = ExtrudeParams::along_normal(length).with_uniform_scale(scale.min(1.0));
        let extrusion = mesh
            .try_apply(|m| m.extrude_face(face, &params))
            .map_err(Rejection::Mesh)?;
        Ok(Protrusion {
            face,
            lineage: from,
            extrusion,
        })
    }

    /// Faces eligible for a protrusion with their selection weights, in
    /// ascending id order. Side faces are weighted up.
    fn candidates(&self, mesh: &MeshModel) -> Vec<(FaceId, f32)> {
        mesh.faces()
            .filter(|(id, _)| {
                mesh.face_aspect_ratio(*id)
                    .is_ok_and(|aspect| aspect <= self.config.max_detail_aspect)
            })
            .map(|(id, face)| {
                let weight = if face.normal.x.abs() < 0.5 {
                    self.config.side_face_bias
                } else {
                    1.0
                };
                (id, weight)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hull::HullBuilder;
    use mesh_kernel::Adjacency;

    fn hull(config: &ShipConfig, seed: u64) -> (MeshModel, SeedContext, HullSegment) {
        let mut mesh = MeshModel::new();
        let mut ctx = SeedContext::new(seed);
        let (segment, _) = HullBuilder::new(config).build(&mut mesh, &mut ctx).unwrap();
        (mesh, ctx, segment)
    }

    #[test]
    fn disabled_pass_draws_nothing() {
        let config = ShipConfig::hull_only();
        let (mut mesh, mut ctx, mut segment) = hull(&config, 3);
        let before = mesh.clone();
        let report = AsymmetryPass::new(&config).run(&mut mesh, &mut ctx, &mut segment).unwrap();
        assert_eq!(report, AsymmetryReport::default());
        assert_eq!(mesh, before);
    }

    #[test]
    fn protrusions_stay_within_requested_count() {
        let config = ShipConfig {
            create_asymmetry_segments: true,
            num_asymmetry_segments_min: 2,
            num_asymmetry_segments_max: 4,
            ..ShipConfig::hull_only()
        };
        for seed in 0..12 {
            let (mut mesh, mut ctx, mut segment) = hull(&config, seed);
            let faces = mesh.face_count();
            let report = AsymmetryPass::new(&config).run(&mut mesh, &mut ctx, &mut segment).unwrap();
            assert!((2..=4).contains(&report.requested));
            assert!(report.extrusions <= report.requested);
            assert!(report.regions <= report.extrusions);
            assert!(mesh.face_count() >= faces + 4 * report.extrusions as usize);
            assert!(mesh.contains_face(segment.front) && mesh.contains_face(segment.rear));
            assert!(Adjacency::build(&mesh).is_closed_manifold());
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn depth_limit_ends_pass_early() {
        // A lone face: every pick after the first lands on the same region.
        let config = ShipConfig {
            create_asymmetry_segments: true,
            num_asymmetry_segments_min: 5,
            num_asymmetry_segments_max: 5,
            max_asymmetry_depth: 1,
            retry_budget: 2,
            ..ShipConfig::hull_only()
        };
        let mut mesh = MeshModel::new();
        let a = mesh.add_vertex(glam::Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(glam::Vec3::new(0.0, 1.0, 0.0));
        let c = mesh.add_vertex(glam::Vec3::new(0.0, 1.0, 1.0));
        let d = mesh.add_vertex(glam::Vec3::new(0.0, 0.0, 1.0));
        let f = mesh.add_face(vec![a, b, c, d], mesh_kernel::Material::Hull).unwrap();
        let mut segment = HullSegment { front: f, rear: f };
        let mut ctx = SeedContext::new(11);
        let report = AsymmetryPass::new(&config).run(&mut mesh, &mut ctx, &mut segment).unwrap();
        assert_eq!(report.extrusions, 1);
        assert!(report.ended_early);
        assert_eq!(report.regions, 1);
    }

    #[test]
    fn lasting_degeneracy_is_fatal() {
        // Two corners share a position, so every extrusion has a flat side.
        let config = ShipConfig {
            create_asymmetry_segments: true,
            num_asymmetry_segments_min: 1,
            num_asymmetry_segments_max: 1,
            retry_budget: 3,
            ..ShipConfig::hull_only()
        };
        let mut mesh = MeshModel::new();
        let a = mesh.add_vertex(glam::Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(glam::Vec3::new(0.0, 1.0, 0.0));
        let c = mesh.add_vertex(glam::Vec3::new(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(glam::Vec3::new(0.0, 0.0, 1.0));
        let f = mesh.add_face(vec![a, b, c, d], mesh_kernel::Material::Hull).unwrap();
        let mut segment = HullSegment { front: f, rear: f };
        let before = mesh.clone();
        let mut ctx = SeedContext::new(5);
        match AsymmetryPass::new(&config).run(&mut mesh, &mut ctx, &mut segment) {
            Err(GenerateError::HullGeneration { stage, retries }) => {
                assert_eq!(stage, "asymmetry");
                assert_eq!(retries, 3);
            }
            other => panic!("expected a fatal asymmetry error, got {other:?}"),
        }
        assert_eq!(mesh, before);
    }
}
