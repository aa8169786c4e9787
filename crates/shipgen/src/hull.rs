//! Hull growth: a randomly scaled box extruded forwards and backwards.

use crate::config::ShipConfig;
use crate::error::GenerateError;
use crate::retry::{with_retries, Attempt};
use crate::seed::SeedContext;
use mesh_kernel::{BoxFace, ExtrudeParams, FaceId, Material, MeshError, MeshModel, MeshResult};
use glam::{Quat, Vec2, Vec3};

/// Extrusions shorter than this would leave a zero-thickness segment.
pub const MIN_SEGMENT_LENGTH: f32 = 1e-3;

/// Tilt applied to a segment cap, in degrees.
const SEGMENT_TILT_DEGREES: f32 = 5.0;

/// The two leading faces carried between hull steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HullSegment {
    pub front: FaceId,
    pub rear: FaceId,
}

impl HullSegment {
    /// Point a leading face at its replacement after it was extruded.
    pub fn follow(&mut self, old: FaceId, new: FaceId) {
        if self.front == old {
            self.front = new;
        }
        if self.rear == old {
            self.rear = new;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullReport {
    pub initial_size: Vec3,
    pub front_segments: u32,
    pub rear_segments: u32,
    pub extrusions: u32,
    pub ribbed_sections: u32,
    pub resamples: u32,
}

/// Which leading face a step grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growth {
    Front,
    Rear,
}

struct GrowthPlan {
    segments: u32,
    length: f32,
}

/// Per-step random draws.
#[derive(Debug, Clone, Copy)]
enum StepShape {
    Plain {
        length: f32,
        tail: Option<f32>,
        scale: Vec2,
        offset: Vec3,
        tilt: Quat,
    },
    Ribbed {
        length: f32,
        ribs: u32,
        rib_scale: f32,
    },
}

pub struct HullBuilder<'a> {
    config: &'a ShipConfig,
}

impl<'a> HullBuilder<'a> {
    pub fn new(config: &'a ShipConfig) -> Self {
        Self { config }
    }

    /// Create the initial box and grow both ends.
    pub fn build(&self, mesh: &mut MeshModel, ctx: &mut SeedContext) -> Result<(HullSegment, HullReport), GenerateError> {
        let size = Vec3::new(
            ctx.range_f32(0.75, 2.0),
            ctx.range_f32(0.75, 2.0),
            ctx.range_f32(0.75, 2.0),
        );
        let faces = mesh.add_box(Vec3::ZERO, size * 0.5, Material::Hull)?;
        let mut hull = HullSegment {
            front: faces[BoxFace::PosX as usize],
            rear: faces[BoxFace::NegX as usize],
        };

        let front = self.draw_plan(ctx);
        let rear = self.draw_plan(ctx);
        let mut report = HullReport {
            initial_size: size,
            front_segments: front.segments,
            rear_segments: rear.segments,
            ..Default::default()
        };
        log::debug!(
            "hull: box {:?}, {} front / {} rear segments",
            size,
            front.segments,
            rear.segments
        );

        for step in 0..front.segments.max(rear.segments) {
            for (growth, plan) in [(Growth::Front, &front), (Growth::Rear, &rear)] {
                if step >= plan.segments {
                    continue;
                }
                let face = match growth {
                    Growth::Front => hull.front,
                    Growth::Rear => hull.rear,
                };
                let is_last = step + 1 == plan.segments;
                let attempt = with_retries(self.config.retry_budget, |_| {
                    let shape = self.draw_step(ctx, plan.length, size.z, is_last);
                    mesh.try_apply(|m| grow(m, face, shape))
                });
                report.resamples += attempt.retries();
                match attempt {
                    Attempt::Succeeded((cap, extrusions, ribbed))
                    | Attempt::Resampled {
                        value: (cap, extrusions, ribbed),
                        ..
                    } => {
                        hull.follow(face, cap);
                        report.extrusions += extrusions;
                        report.ribbed_sections += u32::from(ribbed);
                    }
                    Attempt::Abandoned { retries, last } => {
                        log::debug!("hull: {growth:?} step {step} abandoned: {last}");
                        return Err(GenerateError::HullGeneration { stage: "hull", retries });
                    }
                }
            }
        }
        Ok((hull, report))
    }

    fn draw_plan(&self, ctx: &mut SeedContext) -> GrowthPlan {
        let length = ctx.range_f32(self.config.hull_segment_length_min, self.config.hull_segment_length_max);
        let segments = ctx.range_u32(self.config.num_hull_segments_min, self.config.num_hull_segments_max);
        GrowthPlan { segments, length }
    }

    fn draw_step(&self, ctx: &mut SeedContext, length: f32, height: f32, is_last: bool) -> StepShape {
        if !ctx.chance(0.9) {
            return StepShape::Ribbed {
                length,
                ribs: ctx.range_u32(2, 4),
                rib_scale: ctx.range_f32(0.75, 0.95),
            };
        }

        let tail = ctx.chance(0.25).then_some(length * 0.25);

        let mut scale = Vec2::ONE;
        if ctx.chance(0.5) {
            scale = Vec2::new(ctx.range_f32(1.2, 1.5), ctx.range_f32(1.2, 1.5));
            if is_last || ctx.chance(0.5) {
                scale = Vec2::ONE / scale;
            }
        }

        let mut offset = Vec3::ZERO;
        if ctx.chance(0.5) {
            offset.z = ctx.range_f32(0.1, 0.4) * height * length * ctx.sign();
        }

        let mut tilt = Quat::IDENTITY;
        if ctx.chance(0.5) {
            tilt = Quat::from_rotation_y(SEGMENT_TILT_DEGREES.to_radians() * ctx.sign());
        }

        StepShape::Plain {
            length,
            tail,
            scale,
            offset,
            tilt,
        }
    }
}

/// Apply one step to `face`. Returns the new leading face, the number of
/// extrusions made and whether the step was ribbed.
fn grow(mesh: &mut MeshModel, face: FaceId, shape: StepShape) -> MeshResult<(FaceId, u32, bool)> {
    match shape {
        StepShape::Plain {
            length,
            tail,
            scale,
            offset,
            tilt,
        } => {
            check_length(length)?;
            let lateral = lateral_scale(mesh, face, scale)?;
            let perturb = |params: ExtrudeParams| params.with_scale(lateral).with_offset(offset).with_rotation(tilt);
            match tail {
                None => {
                    let cap = mesh.extrude_face(face, &perturb(ExtrudeParams::along_normal(length)))?.cap;
                    Ok((cap, 1, false))
                }
                Some(tail) => {
                    let body = mesh.extrude_face(face, &ExtrudeParams::along_normal(length))?.cap;
                    let cap = mesh.extrude_face(body, &perturb(ExtrudeParams::along_normal(tail)))?.cap;
                    Ok((cap, 2, false))
                }
            }
        }
        StepShape::Ribbed {
            length,
            ribs,
            rib_scale,
        } => {
            let per_rib = length / ribs as f32;
            check_length(per_rib * 0.25)?;
            let mut cap = face;
            for _ in 0..ribs {
                cap = mesh.extrude_face(cap, &ExtrudeParams::along_normal(per_rib * 0.25))?.cap;
                cap = mesh.extrude_face(cap, &ExtrudeParams::default().with_uniform_scale(rib_scale))?.cap;
                cap = mesh.extrude_face(cap, &ExtrudeParams::along_normal(per_rib * 0.5))?.cap;
                cap = mesh.extrude_face(cap, &ExtrudeParams::default().with_uniform_scale(1.0 / rib_scale))?.cap;
                cap = mesh.extrude_face(cap, &ExtrudeParams::along_normal(per_rib * 0.25))?.cap;
            }
            Ok((cap, ribs * 5, true))
        }
    }
}

fn check_length(length: f32) -> MeshResult<()> {
    if length < MIN_SEGMENT_LENGTH {
        return Err(MeshError::Degenerate {
            operation: "hull_segment",
            reason: "segment length too short",
        });
    }
    Ok(())
}

/// Map a (sideways, vertical) scale onto the face frame's X/Y axes.
fn lateral_scale(mesh: &MeshModel, face: FaceId, scale: Vec2) -> MeshResult<Vec2> {
    let frame = mesh.face_frame(face)?;
    if frame.x.z.abs() > frame.y.z.abs() {
        Ok(Vec2::new(scale.y, scale.x))
    } else {
        Ok(scale)
    }
}
