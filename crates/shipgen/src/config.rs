//! Generation parameters. Every field has a serde default so partial config
//! files stay valid.

use crate::error::ConfigError;
use crate::seed::Seed;
use serde::{Deserialize, Serialize};

/// All options accepted by [`crate::generate_spaceship`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipConfig {
    /// Absent means "derive from the clock".
    #[serde(default)]
    pub seed: Option<Seed>,

    /// Hull segments grown from each of the front and rear faces.
    #[serde(default = "default_hull_segments_min")]
    pub num_hull_segments_min: u32,
    #[serde(default = "default_hull_segments_max")]
    pub num_hull_segments_max: u32,
    #[serde(default = "default_hull_segment_length_min")]
    pub hull_segment_length_min: f32,
    #[serde(default = "default_hull_segment_length_max")]
    pub hull_segment_length_max: f32,

    #[serde(default = "default_true")]
    pub create_asymmetry_segments: bool,
    #[serde(default = "default_one")]
    pub num_asymmetry_segments_min: u32,
    #[serde(default = "default_asymmetry_max")]
    pub num_asymmetry_segments_max: u32,

    #[serde(default = "default_true")]
    pub create_engines: bool,
    #[serde(default = "default_one")]
    pub num_engines_min: u32,
    #[serde(default = "default_detail_max")]
    pub num_engines_max: u32,
    /// Turrets.
    #[serde(default = "default_true")]
    pub create_weapons: bool,
    #[serde(default = "default_one")]
    pub num_weapons_min: u32,
    #[serde(default = "default_detail_max")]
    pub num_weapons_max: u32,
    #[serde(default = "default_true")]
    pub create_antenna: bool,
    #[serde(default = "default_one")]
    pub num_antenna_min: u32,
    #[serde(default = "default_detail_max")]
    pub num_antenna_max: u32,
    #[serde(default = "default_true")]
    pub create_lights: bool,
    #[serde(default = "default_one")]
    pub num_lights_min: u32,
    #[serde(default = "default_detail_max")]
    pub num_lights_max: u32,
    /// Discs, cylinder rows and half-sunk spheres.
    #[serde(default = "default_true")]
    pub create_greebles: bool,
    #[serde(default = "default_one")]
    pub num_greebles_min: u32,
    #[serde(default = "default_greebles_max")]
    pub num_greebles_max: u32,

    /// Mirror across the XZ plane (left/right).
    #[serde(default = "default_true")]
    pub allow_horizontal_symmetry: bool,
    /// Mirror across the XY plane (up/down). Tends to produce floating islands.
    #[serde(default)]
    pub allow_vertical_symmetry: bool,
    #[serde(default = "default_symmetry_probability")]
    pub symmetry_probability: f64,

    #[serde(default = "default_true")]
    pub apply_bevel: bool,
    #[serde(default = "default_bevel_width")]
    pub bevel_width: f32,
    #[serde(default = "default_one")]
    pub bevel_segments: u32,

    /// Translate the finished mesh so its surface centroid sits at the origin.
    #[serde(default = "default_true")]
    pub recenter: bool,
    #[serde(default = "default_uv_scale")]
    pub uv_scale: f32,

    /// Resample attempts per degenerate draw or overlapping placement.
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u32,
    /// Length/scale multiplier applied each time a protrusion region is re-selected.
    #[serde(default = "default_asymmetry_decay")]
    pub asymmetry_decay: f32,
    /// Maximum stacked extrusions per protrusion region.
    #[serde(default = "default_max_asymmetry_depth")]
    pub max_asymmetry_depth: u32,
    /// Selection weight of side faces relative to front/rear faces.
    #[serde(default = "default_side_face_bias")]
    pub side_face_bias: f32,
    /// Faces with a larger aspect ratio get no protrusions or detail.
    #[serde(default = "default_max_detail_aspect")]
    pub max_detail_aspect: f32,
}

fn default_hull_segments_min() -> u32 {
    3
}
fn default_hull_segments_max() -> u32 {
    6
}
fn default_hull_segment_length_min() -> f32 {
    0.3
}
fn default_hull_segment_length_max() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_one() -> u32 {
    1
}
fn default_asymmetry_max() -> u32 {
    5
}
fn default_detail_max() -> u32 {
    3
}
fn default_greebles_max() -> u32 {
    4
}
fn default_symmetry_probability() -> f64 {
    0.5
}
fn default_bevel_width() -> f32 {
    0.04
}
fn default_uv_scale() -> f32 {
    1.0
}
fn default_retry_budget() -> u32 {
    8
}
fn default_asymmetry_decay() -> f32 {
    0.7
}
fn default_max_asymmetry_depth() -> u32 {
    3
}
fn default_side_face_bias() -> f32 {
    4.0
}
fn default_max_detail_aspect() -> f32 {
    4.0
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            seed: None,
            num_hull_segments_min: default_hull_segments_min(),
            num_hull_segments_max: default_hull_segments_max(),
            hull_segment_length_min: default_hull_segment_length_min(),
            hull_segment_length_max: default_hull_segment_length_max(),
            create_asymmetry_segments: true,
            num_asymmetry_segments_min: default_one(),
            num_asymmetry_segments_max: default_asymmetry_max(),
            create_engines: true,
            num_engines_min: default_one(),
            num_engines_max: default_detail_max(),
            create_weapons: true,
            num_weapons_min: default_one(),
            num_weapons_max: default_detail_max(),
            create_antenna: true,
            num_antenna_min: default_one(),
            num_antenna_max: default_detail_max(),
            create_lights: true,
            num_lights_min: default_one(),
            num_lights_max: default_detail_max(),
            create_greebles: true,
            num_greebles_min: default_one(),
            num_greebles_max: default_greebles_max(),
            allow_horizontal_symmetry: true,
            allow_vertical_symmetry: false,
            symmetry_probability: default_symmetry_probability(),
            apply_bevel: true,
            bevel_width: default_bevel_width(),
            bevel_segments: default_one(),
            recenter: true,
            uv_scale: default_uv_scale(),
            retry_budget: default_retry_budget(),
            asymmetry_decay: default_asymmetry_decay(),
            max_asymmetry_depth: default_max_asymmetry_depth(),
            side_face_bias: default_side_face_bias(),
            max_detail_aspect: default_max_detail_aspect(),
        }
    }
}

/// Detail categories with their own toggle and count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetailCategory {
    Engine,
    Turret,
    Antenna,
    Light,
    Greeble,
}

impl DetailCategory {
    /// Placement order.
    pub const ALL: [DetailCategory; 5] = [
        DetailCategory::Engine,
        DetailCategory::Turret,
        DetailCategory::Antenna,
        DetailCategory::Light,
        DetailCategory::Greeble,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DetailCategory::Engine => "engine",
            DetailCategory::Turret => "turret",
            DetailCategory::Antenna => "antenna",
            DetailCategory::Light => "light",
            DetailCategory::Greeble => "greeble",
        }
    }
}

impl ShipConfig {
    /// Config with everything after the hull switched off.
    pub fn hull_only() -> Self {
        Self {
            create_asymmetry_segments: false,
            create_engines: false,
            create_weapons: false,
            create_antenna: false,
            create_lights: false,
            create_greebles: false,
            allow_horizontal_symmetry: false,
            allow_vertical_symmetry: false,
            apply_bevel: false,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Count range for a detail category, or `None` when it is disabled.
    pub fn detail_range(&self, category: DetailCategory) -> Option<(u32, u32)> {
        let (enabled, min, max) = match category {
            DetailCategory::Engine => (self.create_engines, self.num_engines_min, self.num_engines_max),
            DetailCategory::Turret => (self.create_weapons, self.num_weapons_min, self.num_weapons_max),
            DetailCategory::Antenna => (self.create_antenna, self.num_antenna_min, self.num_antenna_max),
            DetailCategory::Light => (self.create_lights, self.num_lights_min, self.num_lights_max),
            DetailCategory::Greeble => (self.create_greebles, self.num_greebles_min, self.num_greebles_max),
        };
        enabled.then_some((min, max))
    }

    /// Reject out-of-range or contradictory values before any mesh work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("num_hull_segments", self.num_hull_segments_min, self.num_hull_segments_max),
            ("num_asymmetry_segments", self.num_asymmetry_segments_min, self.num_asymmetry_segments_max),
            ("num_engines", self.num_engines_min, self.num_engines_max),
            ("num_weapons", self.num_weapons_min, self.num_weapons_max),
            ("num_antenna", self.num_antenna_min, self.num_antenna_max),
            ("num_lights", self.num_lights_min, self.num_lights_max),
            ("num_greebles", self.num_greebles_min, self.num_greebles_max),
        ];
        for (name, min, max) in counts {
            if min > max {
                return Err(ConfigError::InvertedRange {
                    name,
                    min: f64::from(min),
                    max: f64::from(max),
                });
            }
        }

        for (name, value) in [
            ("hull_segment_length_min", self.hull_segment_length_min),
            ("hull_segment_length_max", self.hull_segment_length_max),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLength { name, value });
            }
        }
        if self.hull_segment_length_min > self.hull_segment_length_max {
            return Err(ConfigError::InvertedRange {
                name: "hull_segment_length",
                min: f64::from(self.hull_segment_length_min),
                max: f64::from(self.hull_segment_length_max),
            });
        }

        if !(0.0..=1.0).contains(&self.symmetry_probability) {
            return Err(ConfigError::Probability {
                name: "symmetry_probability",
                value: self.symmetry_probability,
            });
        }

        if self.apply_bevel {
            if !(self.bevel_width > 0.0) || !self.bevel_width.is_finite() {
                return Err(ConfigError::NotPositive {
                    name: "bevel_width",
                    value: f64::from(self.bevel_width),
                });
            }
            if self.bevel_segments == 0 {
                return Err(ConfigError::NotPositive {
                    name: "bevel_segments",
                    value: 0.0,
                });
            }
        }

        if self.retry_budget == 0 {
            return Err(ConfigError::NotPositive {
                name: "retry_budget",
                value: 0.0,
            });
        }
        if self.max_asymmetry_depth == 0 {
            return Err(ConfigError::NotPositive {
                name: "max_asymmetry_depth",
                value: 0.0,
            });
        }
        if !(self.asymmetry_decay > 0.0 && self.asymmetry_decay <= 1.0) {
            return Err(ConfigError::Decay(self.asymmetry_decay));
        }
        for (name, value) in [
            ("side_face_bias", self.side_face_bias),
            ("max_detail_aspect", self.max_detail_aspect),
            ("uv_scale", self.uv_scale),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NotPositive {
                    name,
                    value: f64::from(value),
                });
            }
        }
        Ok(())
    }
}
