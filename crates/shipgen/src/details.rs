//! Detail placement: engines, turrets, antennae, window lights and greebles
//! attached to classified hull faces.

use crate::classify::{ClassifiedFace, FaceClassification, Orientation};
use crate::config::{DetailCategory, ShipConfig};
use crate::hull::HullSegment;
use crate::retry::{with_retries, Attempt};
use crate::seed::SeedContext;
use crate::symmetry::SymmetryPlan;
use mesh_kernel::{ExtrudeParams, FaceId, Material, MeshError, MeshModel, MeshResult, Transform};
use glam::{Quat, Vec2, Vec3};
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// Faces narrower than this get no detail.
pub const MIN_DETAIL_EXTENT: f32 = 0.05;

/// Chance that a greeble on an aft or side face is a lit panel.
const PANEL_CHANCE: f64 = 0.35;

/// One placed piece of detail. Consumed once when its geometry is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailAttachment {
    pub face: FaceId,
    pub category: DetailCategory,
    /// Frame of the detail: origin on (or just above) the face, Z along the
    /// face normal.
    pub transform: Transform,
    /// Footprint radius on the face.
    pub radius: f32,
    shape: DetailShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DetailShape {
    Engine {
        cuts: (u32, u32),
        length: f32,
        taper: f32,
    },
    Lights {
        cuts: (u32, u32),
        depth: f32,
    },
    Turret {
        size: f32,
        depth: f32,
        elevation: f32,
    },
    Antenna {
        base_radius: f32,
        base_depth: f32,
        spire_radius: f32,
        spire_height: f32,
        material: Material,
    },
    Disc {
        radius: f32,
        depth: f32,
    },
    Pipes {
        extents: Vec2,
        grid: (u32, u32),
        thickness: f32,
        segments: u32,
        material: Material,
    },
    Dome {
        radius: f32,
    },
    /// Window-lit hull plating: the host face is recoloured, no geometry.
    Panel,
}

impl DetailShape {
    /// Shapes that rebuild the host face instead of sitting on it.
    fn takes_whole_face(&self) -> bool {
        matches!(
            self,
            DetailShape::Engine { .. }
                | DetailShape::Lights { .. }
                | DetailShape::Pipes { .. }
                | DetailShape::Panel
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailReport {
    pub requested: [u32; 5],
    pub placed: [u32; 5],
    /// Instances dropped after the retry budget ran out.
    pub dropped: u32,
    /// Instances skipped because no eligible face was left.
    pub skipped: u32,
    pub resamples: u32,
}

impl DetailReport {
    pub fn count(&self, category: DetailCategory) -> u32 {
        self.placed[category.index()]
    }

    pub fn total(&self) -> u32 {
        self.placed.iter().sum()
    }
}

#[derive(Debug)]
enum Rejection {
    DoesNotFit,
    Overlap,
    Mesh(MeshError),
}

/// Regions of a face already covered by detail.
#[derive(Debug, Clone, Default)]
struct Occupancy {
    whole: bool,
    spots: Vec<(Vec2, f32)>,
}

impl Occupancy {
    fn is_empty(&self) -> bool {
        !self.whole && self.spots.is_empty()
    }

    fn admits(&self, center: Vec2, radius: f32) -> bool {
        !self.whole && self.spots.iter().all(|(c, r)| c.distance(center) >= r + radius)
    }
}

pub struct DetailPlacer<'a> {
    config: &'a ShipConfig,
    plan: SymmetryPlan,
}

impl<'a> DetailPlacer<'a> {
    pub fn new(config: &'a ShipConfig) -> Self {
        Self {
            config,
            plan: SymmetryPlan::default(),
        }
    }

    /// Restrict placement to the half of the ship the planned mirrors keep.
    pub fn with_plan(mut self, plan: &SymmetryPlan) -> Self {
        self.plan = *plan;
        self
    }

    pub fn place(
        &self,
        mesh: &mut MeshModel,
        ctx: &mut SeedContext,
        classes: &FaceClassification,
        hull: &HullSegment,
    ) -> DetailReport {
        let mut report = DetailReport::default();
        let mut occupancy: HashMap<FaceId, Occupancy> = HashMap::new();

        for category in DetailCategory::ALL {
            let Some((min, max)) = self.config.detail_range(category) else {
                continue;
            };
            let requested = ctx.range_u32(min, max);
            report.requested[category.index()] = requested;

            for instance in 0..requested {
                let candidates = self.eligible(mesh, classes, category, &occupancy);
                let preferred = match (category, instance) {
                    (DetailCategory::Engine, 0) => self.preferred(mesh, hull.rear, &occupancy),
                    (DetailCategory::Light, 0) => self.preferred(mesh, hull.front, &occupancy),
                    _ => None,
                };
                if candidates.is_empty() && preferred.is_none() {
                    log::debug!("details: no eligible face for {}", category.name());
                    report.skipped += requested - instance;
                    break;
                }

                let attempt = with_retries(self.config.retry_budget, |n| {
                    let target = match preferred {
                        Some(face) if n == 0 || candidates.is_empty() => face,
                        _ => *ctx.choose(&candidates).ok_or(Rejection::DoesNotFit)?,
                    };
                    let attachment = self.draw(mesh, ctx, category, &target)?;
                    let occupied = occupancy.get(&attachment.face);
                    if attachment.shape.takes_whole_face() {
                        if occupied.is_some_and(|o| !o.is_empty()) {
                            return Err(Rejection::Overlap);
                        }
                    } else {
                        let spot = spot_of(mesh, &attachment).map_err(Rejection::Mesh)?;
                        if occupied.is_some_and(|o| !o.admits(spot, attachment.radius)) {
                            return Err(Rejection::Overlap);
                        }
                    }
                    mesh.try_apply(|m| materialize(m, &attachment))
                        .map_err(Rejection::Mesh)?;
                    Ok(attachment)
                });
                report.resamples += attempt.retries();
                match attempt {
                    Attempt::Succeeded(attachment) | Attempt::Resampled { value: attachment, .. } => {
                        let entry = occupancy.entry(attachment.face).or_default();
                        if attachment.shape.takes_whole_face() {
                            entry.whole = true;
                        } else if let Ok(spot) = spot_of(mesh, &attachment) {
                            entry.spots.push((spot, attachment.radius));
                        }
                        report.placed[category.index()] += 1;
                    }
                    Attempt::Abandoned { last: Rejection::Mesh(e), .. } => {
                        log::debug!("details: dropped {} {instance}: {e}", category.name());
                        report.dropped += 1;
                    }
                    Attempt::Abandoned { last, .. } => {
                        log::debug!("details: dropped {} {instance}: {last:?}", category.name());
                        report.dropped += 1;
                    }
                }
            }
        }

        log::debug!("details: {report:?}");
        report
    }

    /// Faces a category may use right now, in ascending id order.
    fn eligible(
        &self,
        mesh: &MeshModel,
        classes: &FaceClassification,
        category: DetailCategory,
        occupancy: &HashMap<FaceId, Occupancy>,
    ) -> Vec<ClassifiedFace> {
        use Orientation::*;
        let orientations: &[Orientation] = match category {
            DetailCategory::Engine => &[Aft],
            DetailCategory::Turret => &[Left, Right, Down],
            DetailCategory::Antenna => &[Forward, Up],
            DetailCategory::Light => &[Forward, Up, Left, Right],
            DetailCategory::Greeble => &[Down, Up, Aft, Forward, Left, Right],
        };
        let rebuilds_face = matches!(category, DetailCategory::Engine | DetailCategory::Light);

        let mut out: Vec<ClassifiedFace> = orientations
            .iter()
            .flat_map(|o| classes.bucket(*o).iter().copied())
            .filter(|f| {
                if category == DetailCategory::Antenna && !f.outward {
                    return false;
                }
                match occupancy.get(&f.id) {
                    Some(o) if o.whole || (rebuilds_face && !o.is_empty()) => return false,
                    _ => {}
                }
                f.aspect <= self.config.max_detail_aspect && self.usable(mesh, f.id, rebuilds_face)
            })
            .collect();
        out.sort_by_key(|f| f.id);
        out
    }

    /// Leading hull face used for the first instance of a category, if it is
    /// still an untouched quad on the kept half. Skips the aspect filter.
    fn preferred(
        &self,
        mesh: &MeshModel,
        face: FaceId,
        occupancy: &HashMap<FaceId, Occupancy>,
    ) -> Option<ClassifiedFace> {
        if occupancy.contains_key(&face) || !self.usable(mesh, face, true) {
            return None;
        }
        let normal = mesh.face_normal(face).ok()?;
        let center = mesh.face_center(face).ok()?;
        Some(ClassifiedFace {
            id: face,
            orientation: Orientation::from_normal(normal)?,
            outward: normal.dot(center) > 0.0,
            aspect: mesh.face_aspect_ratio(face).ok()?,
            center,
        })
    }

    /// Live-state checks: the face may have been consumed or had its edges
    /// split since classification.
    fn usable(&self, mesh: &MeshModel, face: FaceId, quad_only: bool) -> bool {
        let Ok(f) = mesh.face(face) else {
            return false;
        };
        if quad_only && f.len() != 4 {
            return false;
        }
        let (Ok(extents), Ok(center)) = (mesh.face_extents(face), mesh.face_center(face)) else {
            return false;
        };
        if extents.min_element() < MIN_DETAIL_EXTENT {
            return false;
        }
        self.plan.keeps(center)
    }

    /// Random shape and placement for one instance on `target`.
    fn draw(
        &self,
        mesh: &MeshModel,
        ctx: &mut SeedContext,
        category: DetailCategory,
        target: &ClassifiedFace,
    ) -> Result<DetailAttachment, Rejection> {
        let frame = mesh.face_frame(target.id).map_err(Rejection::Mesh)?;
        let extents = mesh.face_extents(target.id).map_err(Rejection::Mesh)?;
        let short = extents.min_element();
        let mut transform = frame.transform();

        let (shape, radius, lift) = match category {
            DetailCategory::Engine => {
                let shape = DetailShape::Engine {
                    cuts: engine_cuts(extents, ctx),
                    length: ctx.range_f32(0.3, 0.6),
                    taper: 1.0 / ctx.range_f32(1.3, 1.6),
                };
                (shape, extents.max_element() * 0.5, 0.0)
            }
            DetailCategory::Light => {
                let shape = DetailShape::Lights {
                    cuts: (ctx.range_u32(1, 3), ctx.range_u32(1, 3)),
                    depth: short * ctx.range_f32(0.05, 0.15),
                };
                (shape, extents.max_element() * 0.5, 0.0)
            }
            DetailCategory::Turret => {
                let size = short * ctx.range_f32(0.2, 0.35);
                let depth = size * 0.2;
                let shape = DetailShape::Turret {
                    size,
                    depth,
                    elevation: ctx.range_f32(0.0, FRAC_PI_4),
                };
                (shape, size * 0.5, depth * 0.5)
            }
            DetailCategory::Antenna => {
                let base_radius = short * ctx.range_f32(0.05, 0.1);
                let shape = DetailShape::Antenna {
                    base_radius,
                    base_depth: base_radius * ctx.range_f32(0.3, 0.6),
                    spire_radius: base_radius * ctx.range_f32(0.2, 0.4),
                    spire_height: short * ctx.range_f32(0.5, 1.5),
                    material: if ctx.chance(0.5) { Material::Hull } else { Material::HullDark },
                };
                (shape, base_radius, 0.0)
            }
            DetailCategory::Greeble => match target.orientation {
                Orientation::Down => {
                    let radius = short * ctx.range_f32(0.2, 0.35);
                    let shape = DetailShape::Disc {
                        radius,
                        depth: radius * ctx.range_f32(0.1, 0.2),
                    };
                    (shape, radius, 0.0)
                }
                Orientation::Forward => (DetailShape::Panel, extents.max_element() * 0.5, 0.0),
                Orientation::Aft | Orientation::Left | Orientation::Right if ctx.chance(PANEL_CHANCE) => {
                    (DetailShape::Panel, extents.max_element() * 0.5, 0.0)
                }
                Orientation::Up | Orientation::Aft => {
                    let shape = DetailShape::Pipes {
                        extents,
                        grid: (ctx.range_u32(1, 3), ctx.range_u32(1, 3)),
                        thickness: ctx.range_f32(0.5, 1.0),
                        segments: ctx.range_u32(6, 12),
                        material: if ctx.chance(0.5) { Material::Hull } else { Material::HullDark },
                    };
                    (shape, extents.max_element() * 0.5, 0.0)
                }
                Orientation::Left | Orientation::Right => {
                    let radius = short * ctx.range_f32(0.2, 0.5);
                    (DetailShape::Dome { radius }, radius, 0.0)
                }
            },
        };

        if !shape.takes_whole_face() {
            let room = extents * 0.5 - Vec2::splat(radius);
            if room.min_element() < 0.0 {
                return Err(Rejection::DoesNotFit);
            }
            let offset = Vec2::new(ctx.range_f32(-room.x, room.x), ctx.range_f32(-room.y, room.y));
            transform.translate_local(offset.extend(lift));
            transform.rotate_local_z(ctx.range_f32(0.0, FRAC_PI_2));
        }

        Ok(DetailAttachment {
            face: target.id,
            category,
            transform,
            radius,
            shape,
        })
    }
}

/// Grid for an engine block: cells roughly square along the long side, and
/// a coin flip between one and four cells on square faces.
fn engine_cuts(extents: Vec2, ctx: &mut SeedContext) -> (u32, u32) {
    let ratio = extents.x / extents.y;
    if ratio >= 1.5 {
        ((ratio.round() as u32).saturating_sub(1).min(3), 0)
    } else if ratio <= 1.0 / 1.5 {
        (0, ((1.0 / ratio).round() as u32).saturating_sub(1).min(3))
    } else {
        let n = ctx.range_u32(0, 1);
        (n, n)
    }
}

/// Footprint centre of a point detail in its face's frame.
fn spot_of(mesh: &MeshModel, attachment: &DetailAttachment) -> MeshResult<Vec2> {
    let frame = mesh.face_frame(attachment.face)?;
    Ok(frame.to_local(attachment.transform.position).truncate())
}

fn at(transform: &Transform, position: Vec3, rotation: Quat) -> glam::Mat4 {
    transform.compose(&Transform::from_position_rotation(position, rotation))
}

/// Build the geometry for one attachment.
fn materialize(mesh: &mut MeshModel, attachment: &DetailAttachment) -> MeshResult<()> {
    let t = &attachment.transform;
    match attachment.shape {
        DetailShape::Engine { cuts, length, taper } => {
            for cell in mesh.subdivide_face(attachment.face, cuts.0, cuts.1)? {
                let depth = mesh.face_extents(cell)?.min_element() * length;
                let nozzle = mesh.extrude_face(cell, &ExtrudeParams::along_normal(depth).with_uniform_scale(taper))?;
                let rim = mesh.inset_face(nozzle.cap, 0.15)?;
                let burn = mesh.extrude_face(rim.cap, &ExtrudeParams::along_normal(-0.9 * depth))?;
                for face in nozzle.sides.iter().chain(&rim.sides) {
                    mesh.set_material(*face, Material::HullDark)?;
                }
                for face in burn.sides.iter().chain(std::iter::once(&burn.cap)) {
                    mesh.set_material(*face, Material::EngineGlow)?;
                }
            }
        }
        DetailShape::Lights { cuts, depth } => {
            for cell in mesh.subdivide_face(attachment.face, cuts.0, cuts.1)? {
                let window = mesh.extrude_face(cell, &ExtrudeParams::along_normal(depth).with_uniform_scale(0.8))?;
                for face in window.sides {
                    mesh.set_material(face, Material::HullLights)?;
                }
            }
        }
        DetailShape::Turret { size, depth, elevation } => {
            mesh.add_frustum(&t.to_matrix(), 16, size * 0.5, size * 0.45, depth, Material::Hull)?;
            let pivot = Vec3::new(0.0, 0.0, depth * 0.5 + size * 0.3);
            let sideways = Quat::from_rotation_y(FRAC_PI_2);
            for x in [-0.35, 0.35] {
                let guard = at(t, pivot + Vec3::X * (x * size), sideways);
                mesh.add_frustum(&guard, 12, size * 0.3, size * 0.3, size * 0.1, Material::Hull)?;
            }
            mesh.add_frustum(&at(t, pivot, sideways), 8, size * 0.2, size * 0.2, size * 0.55, Material::HullDark)?;
            let aim = Quat::from_rotation_x(elevation - FRAC_PI_2);
            let length = size * 1.2;
            let reach = aim * Vec3::Z * (size * 0.1 + length * 0.5);
            for x in [-0.1, 0.1] {
                let barrel = at(t, pivot + Vec3::X * (x * size) + reach, aim);
                mesh.add_frustum(&barrel, 8, size * 0.05, size * 0.05, length, Material::HullDark)?;
            }
        }
        DetailShape::Antenna {
            base_radius,
            base_depth,
            spire_radius,
            spire_height,
            material,
        } => {
            let base = at(t, Vec3::Z * (base_depth * 0.5), Quat::IDENTITY);
            mesh.add_frustum(&base, 8, base_radius, base_radius * 0.8, base_depth, material)?;
            let spire = at(t, Vec3::Z * (base_depth + spire_height * 0.5), Quat::IDENTITY);
            mesh.add_frustum(&spire, 6, spire_radius, 0.0, spire_height, material)?;
        }
        DetailShape::Disc { radius, depth } => {
            let base = at(t, Vec3::Z * (depth * 0.5), Quat::IDENTITY);
            mesh.add_frustum(&base, 16, radius, radius * 0.9, depth, Material::Hull)?;
            let glow_depth = depth * 0.25;
            let glow = at(t, Vec3::Z * (depth + glow_depth * 0.5), Quat::IDENTITY);
            mesh.add_frustum(&glow, 16, radius * 0.75, radius * 0.75, glow_depth, Material::GlowDisc)?;
        }
        DetailShape::Pipes {
            extents,
            grid,
            thickness,
            segments,
            material,
        } => {
            let cell = extents / Vec2::new(grid.0 as f32, grid.1 as f32);
            let radius = (cell.y * 0.35).min(cell.x * 0.3) * thickness;
            let sideways = Quat::from_rotation_y(FRAC_PI_2);
            for j in 0..grid.1 {
                for i in 0..grid.0 {
                    let x = -extents.x * 0.5 + (i as f32 + 0.5) * cell.x;
                    let y = -extents.y * 0.5 + (j as f32 + 0.5) * cell.y;
                    let pipe = at(t, Vec3::new(x, y, radius), sideways);
                    mesh.add_frustum(&pipe, segments, radius, radius, cell.x * 0.8, material)?;
                }
            }
        }
        DetailShape::Dome { radius } => {
            mesh.add_uv_sphere(&t.to_matrix(), radius, 12, 8, Material::Hull)?;
        }
        DetailShape::Panel => mesh.set_material(attachment.face, Material::HullLights)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FaceClassifier;
    use crate::hull::HullBuilder;
    use mesh_kernel::{Adjacency, BoxFace};

    fn only(category: DetailCategory, min: u32, max: u32) -> ShipConfig {
        let mut config = ShipConfig::hull_only();
        match category {
            DetailCategory::Engine => (config.create_engines, config.num_engines_min, config.num_engines_max) = (true, min, max),
            DetailCategory::Turret => (config.create_weapons, config.num_weapons_min, config.num_weapons_max) = (true, min, max),
            DetailCategory::Antenna => (config.create_antenna, config.num_antenna_min, config.num_antenna_max) = (true, min, max),
            DetailCategory::Light => (config.create_lights, config.num_lights_min, config.num_lights_max) = (true, min, max),
            DetailCategory::Greeble => (config.create_greebles, config.num_greebles_min, config.num_greebles_max) = (true, min, max),
        }
        config
    }

    fn run(config: &ShipConfig, seed: u64) -> (MeshModel, DetailReport) {
        let mut mesh = MeshModel::new();
        let mut ctx = SeedContext::new(seed);
        let (hull, _) = HullBuilder::new(config).build(&mut mesh, &mut ctx).unwrap();
        let classes = FaceClassifier::classify(&mesh);
        let report = DetailPlacer::new(config).place(&mut mesh, &mut ctx, &classes, &hull);
        (mesh, report)
    }

    fn count(mesh: &MeshModel, material: Material) -> usize {
        mesh.faces().filter(|(_, f)| f.material == material).count()
    }

    #[test]
    fn first_engine_lands_on_the_rear() {
        let config = only(DetailCategory::Engine, 1, 1);
        for seed in 0..8 {
            let (mesh, report) = run(&config, seed);
            assert_eq!(report.count(DetailCategory::Engine), 1);
            assert!(count(&mesh, Material::EngineGlow) >= 5);
            assert!(count(&mesh, Material::HullDark) >= 8);
            assert!(Adjacency::build(&mesh).is_closed_manifold());
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn lights_carry_window_material() {
        let config = only(DetailCategory::Light, 1, 2);
        for seed in 0..8 {
            let (mesh, report) = run(&config, seed);
            assert!(report.count(DetailCategory::Light) >= 1);
            assert!(count(&mesh, Material::HullLights) >= 4);
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn counts_stay_within_configured_range() {
        for category in DetailCategory::ALL {
            let config = only(category, 0, 2);
            for seed in 0..6 {
                let (_, report) = run(&config, seed);
                assert!(report.count(category) <= 2, "{category:?} seed {seed}");
                for other in DetailCategory::ALL {
                    if other != category {
                        assert_eq!(report.count(other), 0);
                    }
                }
            }
        }
    }

    #[test]
    fn plan_excludes_the_discarded_half() {
        let config = only(DetailCategory::Light, 1, 1);
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::splat(0.5), Material::Hull).unwrap();
        let classes = FaceClassifier::classify(&mesh);
        let occupancy = HashMap::new();
        let plan = SymmetryPlan {
            horizontal: true,
            vertical: false,
        };

        let ids = |placer: &DetailPlacer| -> Vec<FaceId> {
            placer
                .eligible(&mesh, &classes, DetailCategory::Light, &occupancy)
                .iter()
                .map(|f| f.id)
                .collect()
        };
        let kept = ids(&DetailPlacer::new(&config).with_plan(&plan));
        assert!(kept.contains(&faces[BoxFace::PosY as usize]));
        assert!(kept.contains(&faces[BoxFace::PosX as usize]));
        assert!(!kept.contains(&faces[BoxFace::NegY as usize]));
        let all = ids(&DetailPlacer::new(&config));
        assert!(all.contains(&faces[BoxFace::NegY as usize]));
    }

    #[test]
    fn long_thin_faces_are_not_eligible() {
        let config = only(DetailCategory::Light, 1, 1);
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::new(2.0, 0.1, 0.3), Material::Hull).unwrap();
        let classes = FaceClassifier::classify(&mesh);
        let eligible: Vec<FaceId> = DetailPlacer::new(&config)
            .eligible(&mesh, &classes, DetailCategory::Light, &HashMap::new())
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(eligible, vec![faces[BoxFace::PosX as usize]]);
    }

    #[test]
    fn forward_greebles_are_lit_panels() {
        let config = only(DetailCategory::Greeble, 1, 1);
        let mut mesh = MeshModel::new();
        let faces = mesh.add_box(Vec3::ZERO, Vec3::splat(0.5), Material::Hull).unwrap();
        let classes = FaceClassifier::classify(&mesh);
        let front = classes.bucket(Orientation::Forward)[0];
        assert_eq!(front.id, faces[BoxFace::PosX as usize]);

        let placer = DetailPlacer::new(&config);
        let mut ctx = SeedContext::new(3);
        let attachment = placer.draw(&mesh, &mut ctx, DetailCategory::Greeble, &front).unwrap();
        assert_eq!(attachment.shape, DetailShape::Panel);
        assert!(attachment.shape.takes_whole_face());

        let before = mesh.face_count();
        materialize(&mut mesh, &attachment).unwrap();
        assert_eq!(mesh.face_count(), before);
        assert_eq!(count(&mesh, Material::HullLights), 1);
        assert_eq!(mesh.face(front.id).unwrap().material, Material::HullLights);
    }

    #[test]
    fn side_greebles_mix_panels_and_domes() {
        let config = only(DetailCategory::Greeble, 1, 1);
        let mut mesh = MeshModel::new();
        mesh.add_box(Vec3::ZERO, Vec3::splat(0.5), Material::Hull).unwrap();
        let classes = FaceClassifier::classify(&mesh);
        let side = classes.bucket(Orientation::Left)[0];
        let placer = DetailPlacer::new(&config);
        let mut ctx = SeedContext::new(17);
        let shapes: Vec<DetailShape> = (0..64)
            .map(|_| placer.draw(&mesh, &mut ctx, DetailCategory::Greeble, &side).unwrap().shape)
            .collect();
        assert!(shapes.contains(&DetailShape::Panel));
        assert!(shapes.iter().any(|s| matches!(s, DetailShape::Dome { .. })));
    }

    #[test]
    fn occupancy_rejects_overlapping_spots() {
        let mut occupied = Occupancy::default();
        assert!(occupied.admits(Vec2::ZERO, 1.0));
        occupied.spots.push((Vec2::ZERO, 0.5));
        assert!(!occupied.admits(Vec2::new(0.8, 0.0), 0.5));
        assert!(occupied.admits(Vec2::new(1.0, 0.0), 0.5));
        occupied.whole = true;
        assert!(!occupied.admits(Vec2::new(5.0, 5.0), 0.1));
    }
}
