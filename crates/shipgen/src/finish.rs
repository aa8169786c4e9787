//! Finishing: bevel, recentering, cube-projected UVs and the material
//! palette.

use crate::config::ShipConfig;
use crate::error::GenerateError;
use crate::output::{MaterialAssignment, ShipFace, ShipMesh};
use crate::seed::SeedContext;
use glam::{Vec2, Vec3};
use mesh_kernel::{Axis, BevelReport, Material, MeshModel};

/// Colours for the five material classes, drawn once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPalette {
    pub hull: [f32; 3],
    pub hull_dark: [f32; 3],
    /// Emission of engine burns and landing discs.
    pub glow: [f32; 3],
    /// Emission of lit windows.
    pub window: [f32; 3],
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            hull: [0.5, 0.5, 0.5],
            hull_dark: [0.15, 0.15, 0.15],
            glow: [1.0, 0.6, 0.2],
            window: WINDOW_GLOW,
        }
    }
}

const WINDOW_GLOW: [f32; 3] = [1.0, 0.85, 0.55];

impl MaterialPalette {
    pub fn draw(ctx: &mut SeedContext) -> Self {
        let hull = hls_to_rgb(ctx.unit(), ctx.range_f32(0.05, 0.5), ctx.range_f32(0.0, 0.25));
        let glow = hls_to_rgb(ctx.unit(), ctx.range_f32(0.5, 1.0), 1.0);
        Self {
            hull,
            hull_dark: hull.map(|c| c * 0.3),
            glow,
            window: WINDOW_GLOW,
        }
    }

    /// Diffuse colour of a material class.
    pub fn base_color(&self, material: Material) -> [f32; 3] {
        match material {
            Material::Hull | Material::HullLights => self.hull,
            Material::HullDark => self.hull_dark,
            Material::EngineGlow | Material::GlowDisc => [0.0; 3],
        }
    }

    pub fn emission(&self, material: Material) -> Option<[f32; 3]> {
        match material {
            Material::HullLights => Some(self.window),
            Material::EngineGlow | Material::GlowDisc => Some(self.glow),
            Material::Hull | Material::HullDark => None,
        }
    }
}

/// HLS to RGB, all components in `[0, 1]`.
pub fn hls_to_rgb(h: f32, l: f32, s: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    let channel = |hue: f32| {
        let hue = hue.rem_euclid(1.0);
        if hue < 1.0 / 6.0 {
            m1 + (m2 - m1) * hue * 6.0
        } else if hue < 0.5 {
            m2
        } else if hue < 2.0 / 3.0 {
            m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
        } else {
            m1
        }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

/// Texture coordinates from the world-space plane the normal faces most.
pub fn cube_uv(p: Vec3, normal: Vec3, scale: f32) -> Vec2 {
    let n = normal.abs();
    let uv = if n.x >= n.y && n.x >= n.z {
        Vec2::new(p.y, p.z)
    } else if n.y >= n.z {
        Vec2::new(p.x, p.z)
    } else {
        Vec2::new(p.x, p.y)
    };
    uv * scale
}

pub struct Finished {
    pub mesh: ShipMesh,
    pub materials: MaterialAssignment,
    pub palette: MaterialPalette,
    pub bevel: Option<BevelReport>,
}

pub struct Finisher<'a> {
    config: &'a ShipConfig,
}

impl<'a> Finisher<'a> {
    pub fn new(config: &'a ShipConfig) -> Self {
        Self { config }
    }

    /// `mirrored` axes are left uncentred so the mirror planes stay put.
    pub fn finish(
        &self,
        mut mesh: MeshModel,
        ctx: &mut SeedContext,
        mirrored: &[Axis],
    ) -> Result<Finished, GenerateError> {
        let palette = MaterialPalette::draw(ctx);

        let bevel = if self.config.apply_bevel {
            match mesh.bevel(self.config.bevel_width, self.config.bevel_segments) {
                Ok(report) => {
                    log::debug!("finish: bevel {report:?}");
                    Some(report)
                }
                Err(e) => {
                    log::warn!("finish: skipping bevel: {e}");
                    None
                }
            }
        } else {
            None
        };

        mesh.compact();
        if self.config.recenter {
            let mut shift = surface_centroid(&mesh);
            for axis in mirrored {
                shift[axis.index()] = 0.0;
            }
            if shift.is_finite() && shift != Vec3::ZERO {
                mesh.map_positions(|p| p - shift);
            }
        }
        mesh.validate().map_err(GenerateError::InvalidMesh)?;

        let scale = self.config.uv_scale;
        let positions = mesh.positions().to_vec();
        let mut faces = Vec::with_capacity(mesh.face_count());
        let mut materials = Vec::with_capacity(mesh.face_count());
        for (_, face) in mesh.faces() {
            let uvs = face
                .vertices
                .iter()
                .map(|v| cube_uv(positions[*v as usize], face.normal, scale))
                .collect();
            faces.push(ShipFace {
                vertices: face.vertices.clone(),
                normal: face.normal,
                uvs,
            });
            materials.push(face.material);
        }

        Ok(Finished {
            mesh: ShipMesh { positions, faces },
            materials: MaterialAssignment::new(materials),
            palette,
            bevel,
        })
    }
}

/// Area-weighted centroid of all faces.
fn surface_centroid(mesh: &MeshModel) -> Vec3 {
    let (weighted, area) = mesh
        .faces()
        .filter_map(|(id, _)| Some((mesh.face_centroid(id).ok()?, mesh.face_area(id).ok()?)))
        .fold((Vec3::ZERO, 0.0), |(sum, total), (c, a)| (sum + c * a, total + a));
    if area > 0.0 {
        weighted / area
    } else {
        Vec3::ZERO
    }
}
