//! Gameplay tuning.
//!
//! Every value has a compiled-in default; a JSON file may override any subset
//! of fields (`#[serde(default)]` on every table).

use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Forces, limits and thresholds of the car model. Units are per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub car_mass: f32,
    pub moment_of_inertia: f32,

    pub engine_force: f32,
    pub brake_force: f32,
    pub reverse_force: f32,
    pub steering_force: f32,

    pub max_speed: f32,
    pub max_reverse_speed: f32,

    pub drag_coefficient: f32,
    pub rolling_resistance: f32,

    pub traction_coefficient: f32,
    pub min_traction: f32,
    /// Traction lost at `max_speed`.
    pub traction_speed_falloff: f32,

    pub drift_threshold: f32,
    /// Radians between heading and velocity before a turn counts as a drift.
    pub drift_angle_threshold: f32,
    /// Lateral friction multiplier while drifting.
    pub drift_momentum_preservation: f32,

    pub angular_drag: f32,
    pub max_angular_velocity: f32,

    /// Negative: reflects the velocity component hitting a wall.
    pub bounce_damping: f32,
    /// Applied to the velocity component parallel to the wall on impact.
    pub collision_friction: f32,
    /// Distance from an edge at which the car counts as "at the boundary".
    pub boundary_proximity: f32,

    // Platform scaling. Desktop keeps 1.0; touch schemes copy the mobile values in.
    pub engine_force_multiplier: f32,
    pub steering_force_multiplier: f32,
    pub torque_multiplier: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            car_mass: 1000.0,
            moment_of_inertia: 1500.0,
            engine_force: 15.0,
            brake_force: 25.0,
            reverse_force: 8.0,
            steering_force: 15.0,
            max_speed: 2.5,
            max_reverse_speed: 0.5,
            drag_coefficient: 0.5,
            rolling_resistance: 2.0,
            traction_coefficient: 0.9,
            min_traction: 0.3,
            traction_speed_falloff: 0.4,
            drift_threshold: 0.6,
            drift_angle_threshold: 0.25,
            drift_momentum_preservation: 0.95,
            angular_drag: 0.95,
            max_angular_velocity: 0.06,
            bounce_damping: -0.3,
            collision_friction: 0.7,
            boundary_proximity: 3.0,
            engine_force_multiplier: 1.0,
            steering_force_multiplier: 1.0,
            torque_multiplier: 1.0,
        }
    }
}

/// Geometry of the circular touch control, in screen pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialTuning {
    pub thumb_size: f32,
    pub safety_padding: f32,
    pub thumb_padding: f32,
    pub dead_zone: f32,
    pub steering_lerp: f32,
    pub return_lerp: f32,
    pub return_to_center: bool,
    /// Multi-turn limit of the cumulative angle, either direction.
    pub max_rotation: f32,
}

impl Default for DialTuning {
    fn default() -> Self {
        Self {
            thumb_size: 55.0,
            safety_padding: 10.0,
            thumb_padding: 5.0,
            dead_zone: 0.1,
            steering_lerp: 0.15,
            return_lerp: 0.1,
            return_to_center: false,
            max_rotation: PI * 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileTuning {
    pub engine_force_multiplier: f32,
    pub steering_force_multiplier: f32,
    pub torque_multiplier: f32,
    /// Turn intensity multiplier near a world edge, to ease escaping corners.
    pub boundary_turn_assist: f32,
    /// Joystick turn axis beyond which a fast turn feeds the drift classifier.
    pub horizontal_swipe_threshold: f32,
    /// Minimum speed for touch steering to count toward a drift.
    pub drift_speed: f32,
    pub dial: DialTuning,
}

impl Default for MobileTuning {
    fn default() -> Self {
        Self {
            engine_force_multiplier: 1.2,
            steering_force_multiplier: 1.3,
            torque_multiplier: 1.5,
            boundary_turn_assist: 1.8,
            horizontal_swipe_threshold: 0.7,
            drift_speed: 0.5,
            dial: DialTuning::default(),
        }
    }
}

/// Axis-aligned world rectangle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: -50.0,
            max_x: 50.0,
            min_z: -50.0,
            max_z: 50.0,
        }
    }
}

impl WorldBounds {
    /// True when `position` is within `threshold` of any edge (inclusive).
    pub fn is_near_edge(&self, position: Vec3, threshold: f32) -> bool {
        position.x <= self.min_x + threshold
            || position.x >= self.max_x - threshold
            || position.z <= self.min_z + threshold
            || position.z >= self.max_z - threshold
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarTuning {
    pub start_position: [f32; 3],
    pub start_yaw: f32,
    /// Footprint used by the renderer (x = width, y = length).
    pub footprint: [f32; 2],
    pub color: u32,
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            start_position: [15.0, 1.0, 15.0],
            start_yaw: PI,
            footprint: [2.5 * 1.5, 4.5 * 1.5],
            color: 0xff7251,
        }
    }
}

impl CarTuning {
    pub fn start_position(&self) -> Vec3 {
        Vec3::from_array(self.start_position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Profile,
    Education,
    Experience,
    Projects,
    Skills,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Education => "Education",
            Self::Experience => "Experience",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub kind: SectionKind,
    pub title: String,
    /// Plate center on the ground plane (x, z).
    pub center: [f32; 2],
    /// Plate extent (x, z).
    pub size: [f32; 2],
    pub color: u32,
}

fn default_sections() -> Vec<SectionConfig> {
    let plate = |kind, title: &str, center, size, color| SectionConfig {
        kind,
        title: title.to_owned(),
        center,
        size,
        color,
    };
    vec![
        plate(SectionKind::Profile, "Profile", [0.0, 0.0], [18.0, 18.0], 0xff7251),
        plate(SectionKind::Education, "Education", [30.0, -30.0], [15.0, 15.0], 0x9b2948),
        plate(SectionKind::Experience, "Experience", [-30.0, 30.0], [15.0, 15.0], 0xffca7b),
        plate(SectionKind::Projects, "Projects", [30.0, 30.0], [15.0, 15.0], 0xffcd74),
        plate(SectionKind::Skills, "Skills", [-30.0, -30.0], [15.0, 15.0], 0xffedbf),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiTuning {
    pub panel_cooldown_ms: u64,
    pub loading_delay_ms: u64,
    pub camera_follow_lerp: f32,
    pub pixels_per_unit: f32,
    pub background_color: u32,
    pub ground_color: u32,
    pub grid_color: u32,
    pub boundary_color: u32,
    pub drift_color: u32,
}

impl Default for UiTuning {
    fn default() -> Self {
        Self {
            panel_cooldown_ms: 1500,
            loading_delay_ms: 1000,
            camera_follow_lerp: 0.05,
            pixels_per_unit: 8.0,
            background_color: 0x000000,
            ground_color: 0xffedbf,
            grid_color: 0x9b2948,
            boundary_color: 0xff7251,
            drift_color: 0x333333,
        }
    }
}

/// Root configuration table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub mobile: MobileTuning,
    pub world: WorldBounds,
    pub car: CarTuning,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
    pub ui: UiTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            mobile: MobileTuning::default(),
            world: WorldBounds::default(),
            car: CarTuning::default(),
            sections: default_sections(),
            ui: UiTuning::default(),
        }
    }
}

impl Tuning {
    /// Defaults, overridden by `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let tuning = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| AppError::TuningIo {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&text).map_err(|source| AppError::TuningParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let p = &self.physics;
        if !(p.car_mass > 0.0) {
            return Err(AppError::InvalidTuning(format!(
                "car_mass must be positive, got {}",
                p.car_mass
            )));
        }
        if !(p.moment_of_inertia > 0.0) {
            return Err(AppError::InvalidTuning(format!(
                "moment_of_inertia must be positive, got {}",
                p.moment_of_inertia
            )));
        }
        let w = &self.world;
        if w.max_x - w.min_x <= 1.0 || w.max_z - w.min_z <= 1.0 {
            return Err(AppError::InvalidTuning(
                "world bounds must be wider than the 0.5 edge margin on both sides".into(),
            ));
        }
        Ok(())
    }

    /// Copy the mobile force multipliers into the physics table.
    pub fn apply_touch_multipliers(&mut self) {
        self.physics.engine_force_multiplier = self.mobile.engine_force_multiplier;
        self.physics.steering_force_multiplier = self.mobile.steering_force_multiplier;
        self.physics.torque_multiplier = self.mobile.torque_multiplier;
    }
}
