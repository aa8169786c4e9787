//! Material classes carried on every face.

use serde::{Deserialize, Serialize};

/// Fixed set of surface materials a face can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    /// Plain spaceship hull.
    #[default]
    Hull,
    /// Hull with emissive windows.
    HullLights,
    /// Darkened hull (engine nozzles, antenna bodies).
    HullDark,
    /// Emissive engine burn.
    EngineGlow,
    /// Emissive landing-pad disc.
    GlowDisc,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Hull,
        Material::HullLights,
        Material::HullDark,
        Material::EngineGlow,
        Material::GlowDisc,
    ];

    /// Stable index, used for material slots in exported files.
    pub fn index(self) -> u32 {
        match self {
            Material::Hull => 0,
            Material::HullLights => 1,
            Material::HullDark => 2,
            Material::EngineGlow => 3,
            Material::GlowDisc => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Material::Hull => "hull",
            Material::HullLights => "hull_lights",
            Material::HullDark => "hull_dark",
            Material::EngineGlow => "engine_glow",
            Material::GlowDisc => "glow_disc",
        }
    }

    /// Material for geometry created between faces (bevel strips and
    /// corners): shared material if all neighbours agree, plain hull otherwise.
    pub fn blend(materials: impl IntoIterator<Item = Material>) -> Material {
        let mut iter = materials.into_iter();
        let Some(first) = iter.next() else {
            return Material::Hull;
        };
        if iter.all(|m| m == first) {
            first
        } else {
            Material::Hull
        }
    }
}
