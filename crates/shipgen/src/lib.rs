//! Seeded procedural spaceship generation.
//!
//! One run is a fixed sequence of stages over a single `MeshModel`, all
//! drawing from one `SeedContext`:
//! - `HullBuilder`: a random box grown forwards and backwards by extrusion
//! - `AsymmetryPass`: off-axis protrusions
//! - `FaceClassifier` + `DetailPlacer`: engines, turrets, antennae, lights
//!   and greebles on orientation-bucketed faces
//! - `SymmetryApplier`: optional left/right and up/down mirroring
//! - `Finisher`: bevel, recentering, cube UVs and the material palette
//!
//! The same configuration and seed always produce the same ship.

pub mod asymmetry;
pub mod classify;
pub mod config;
pub mod details;
pub mod error;
pub mod finish;
pub mod hull;
pub mod output;
pub mod retry;
pub mod seed;
pub mod symmetry;

pub use asymmetry::{AsymmetryPass, AsymmetryReport};
pub use classify::{ClassifiedFace, FaceClassification, FaceClassifier, Orientation};
pub use config::{DetailCategory, ShipConfig};
pub use details::{DetailPlacer, DetailReport};
pub use error::{ConfigError, GenerateError, SymmetryError};
pub use finish::{Finisher, MaterialPalette};
pub use hull::{HullBuilder, HullReport, HullSegment};
pub use output::{GenerationReport, MaterialAssignment, ShipFace, ShipMesh, ShipVertex, Spaceship};
pub use retry::{with_retries, Attempt};
pub use seed::{Seed, SeedContext};
pub use symmetry::{SymmetryApplier, SymmetryPlan};

pub use mesh_kernel::{Axis, Material};

use mesh_kernel::MeshModel;

/// Run the whole pipeline.
///
/// Fails before touching any geometry if the configuration is invalid, and
/// with `HullGeneration` if the hull or an asymmetry protrusion stays
/// degenerate through every resample. Detail shortfalls, weld failures and
/// bevel failures are recovered and only show up in the report.
pub fn generate_spaceship(config: &ShipConfig) -> Result<Spaceship, GenerateError> {
    config.validate()?;
    let mut ctx = SeedContext::from_seed(config.seed.as_ref());
    let seed = ctx.seed();

    let plan = SymmetryPlan::draw(config, &mut ctx);
    let mut mesh = MeshModel::new();
    let (mut hull, hull_report) = HullBuilder::new(config).build(&mut mesh, &mut ctx)?;
    let asymmetry = AsymmetryPass::new(config).run(&mut mesh, &mut ctx, &mut hull)?;
    let classes = FaceClassifier::classify(&mesh);
    let details = DetailPlacer::new(config)
        .with_plan(&plan)
        .place(&mut mesh, &mut ctx, &classes, &hull);
    let symmetry = SymmetryApplier::apply(&mut mesh, &plan);
    let mirrors: Vec<Axis> = symmetry.applied_axes().collect();
    let finished = Finisher::new(config).finish(mesh, &mut ctx, &mirrors)?;

    log::info!(
        "ship {seed}: {} faces, {} vertices, {} details, mirrors {:?}",
        finished.mesh.face_count(),
        finished.mesh.vertex_count(),
        details.total(),
        mirrors
    );

    Ok(Spaceship {
        seed,
        mesh: finished.mesh,
        materials: finished.materials,
        palette: finished.palette,
        report: GenerationReport {
            hull: hull_report,
            asymmetry,
            details,
            mirrors,
            weld_fallbacks: symmetry.fell_back,
            bevel: finished.bevel,
        },
    })
}
