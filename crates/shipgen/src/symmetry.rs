//! Optional bilateral mirroring of the finished detail pass.

use crate::config::ShipConfig;
use crate::error::SymmetryError;
use crate::seed::SeedContext;
use mesh_kernel::{Axis, MeshModel, MirrorReport};
use glam::Vec3;

/// Distance under which vertices are snapped onto the mirror plane and
/// welded to their reflections.
pub const WELD_EPSILON: f32 = 1e-4;

/// Which mirrors this run will apply. Drawn before the hull so detail
/// placement can stay on the kept half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymmetryPlan {
    /// Left/right mirror across the XZ plane, keeping +Y.
    pub horizontal: bool,
    /// Up/down mirror across the XY plane, keeping +Z.
    pub vertical: bool,
}

impl SymmetryPlan {
    /// One draw per allowed mirror.
    pub fn draw(config: &ShipConfig, ctx: &mut SeedContext) -> Self {
        let p = config.symmetry_probability;
        Self {
            horizontal: config.allow_horizontal_symmetry && ctx.chance(p),
            vertical: config.allow_vertical_symmetry && ctx.chance(p),
        }
    }

    pub fn axes(&self) -> impl Iterator<Item = Axis> {
        [(self.horizontal, Axis::Y), (self.vertical, Axis::Z)]
            .into_iter()
            .filter_map(|(on, axis)| on.then_some(axis))
    }

    /// Whether `p` lies on a half that survives every planned mirror.
    pub fn keeps(&self, p: Vec3) -> bool {
        self.axes().all(|axis| p.dot(axis.unit()) >= -WELD_EPSILON)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymmetryOutcome {
    pub applied: Vec<(Axis, MirrorReport)>,
    /// Mirrors skipped because the seam could not be welded.
    pub fell_back: Vec<Axis>,
}

impl SymmetryOutcome {
    pub fn applied_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        self.applied.iter().map(|(axis, _)| *axis)
    }
}

pub struct SymmetryApplier;

impl SymmetryApplier {
    /// Apply each planned mirror. A mirror that fails leaves the mesh as it
    /// was and is recorded as a fallback; the run continues asymmetric.
    pub fn apply(mesh: &mut MeshModel, plan: &SymmetryPlan) -> SymmetryOutcome {
        let mut outcome = SymmetryOutcome::default();
        for axis in plan.axes() {
            match mesh.bisect_and_mirror(axis, WELD_EPSILON) {
                Ok(report) => {
                    log::debug!("symmetry: mirrored across {axis:?}: {report:?}");
                    outcome.applied.push((axis, report));
                }
                Err(source) => {
                    let err = SymmetryError::WeldFailure {
                        axis,
                        source: source.clone(),
                    };
                    log::warn!("symmetry: {err} ({source}), keeping the asymmetric mesh");
                    outcome.fell_back.push(axis);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_kernel::{is_mirror_symmetric, Adjacency, Material, Transform};

    #[test]
    fn plan_respects_toggles() {
        let mut ctx = SeedContext::new(5);
        let config = ShipConfig {
            allow_horizontal_symmetry: true,
            allow_vertical_symmetry: false,
            symmetry_probability: 1.0,
            ..Default::default()
        };
        let plan = SymmetryPlan::draw(&config, &mut ctx);
        assert!(plan.horizontal && !plan.vertical);
        assert_eq!(plan.axes().collect::<Vec<_>>(), vec![Axis::Y]);

        let never = ShipConfig {
            allow_vertical_symmetry: true,
            symmetry_probability: 0.0,
            ..Default::default()
        };
        assert_eq!(SymmetryPlan::draw(&never, &mut ctx), SymmetryPlan::default());
    }

    #[test]
    fn kept_half_check() {
        let plan = SymmetryPlan {
            horizontal: true,
            vertical: true,
        };
        assert!(plan.keeps(Vec3::new(-3.0, 0.5, 0.0)));
        assert!(!plan.keeps(Vec3::new(0.0, -0.5, 1.0)));
        assert!(!plan.keeps(Vec3::new(0.0, 0.5, -1.0)));
        assert!(SymmetryPlan::default().keeps(Vec3::splat(-10.0)));
    }

    #[test]
    fn mirrored_box_is_symmetric() {
        let mut mesh = MeshModel::new();
        mesh.add_box(Vec3::new(0.5, 0.4, 0.0), Vec3::new(1.0, 0.8, 0.5), Material::Hull).unwrap();
        let plan = SymmetryPlan {
            horizontal: true,
            vertical: false,
        };
        let outcome = SymmetryApplier::apply(&mut mesh, &plan);
        assert_eq!(outcome.applied_axes().collect::<Vec<_>>(), vec![Axis::Y]);
        assert!(outcome.fell_back.is_empty());
        assert!(is_mirror_symmetric(&mesh, Axis::Y, 1e-4));
        assert!(Adjacency::build(&mesh).is_closed_manifold());
    }

    #[test]
    fn unweldable_seam_falls_back() {
        // Triangular prism resting on its ridge: the mirrored halves only
        // share an edge, never a face.
        let mut mesh = MeshModel::new();
        let r = 0.5;
        let on_ridge = Transform::from_axes(Vec3::new(0.0, r, 0.0), -Vec3::Y, -Vec3::Z, Vec3::X);
        mesh.add_frustum(&on_ridge.to_matrix(), 3, r, r, 2.0, Material::Hull).unwrap();
        let before = mesh.clone();
        let plan = SymmetryPlan {
            horizontal: true,
            vertical: false,
        };
        let outcome = SymmetryApplier::apply(&mut mesh, &plan);
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.fell_back, vec![Axis::Y]);
        assert_eq!(mesh, before);
    }
}
