mod physics;

pub use physics::{DriveFlags, VehicleBody, WeightTransfer};

use glam::{Vec2, Vec3};

use crate::config::{SectionConfig, SectionKind};

/// Render transform of the car. Absent until the car model has loaded; every
/// control and physics system treats a missing pose as "not ready".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Heading around +Y, radians.
    pub yaw: f32,
    /// Visual roll, radians. Never read by the physics.
    pub tilt: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            tilt: 0.0,
        }
    }
}

/// Marker: the player's car.
pub struct Car;

/// Marker: the car model is still "loading". Removed once the pose is attached.
pub struct PendingModel {
    pub remaining_ms: f32,
}

/// Per-frame snapshot for the renderer, camera, HUD and section tracker.
///
/// Drive flags are captured before the physics step clears them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Telemetry {
    pub position: Vec3,
    pub yaw: f32,
    pub tilt: f32,
    pub velocity: Vec3,
    pub speed: f32,
    /// Steering deflection in [-1, 1], positive for left.
    pub steering: f32,
    pub drifting: bool,
    pub flags: DriveFlags,
    pub at_boundary: bool,
    pub moved: bool,
}

/// Interactive ground plate that opens an info panel.
#[derive(Debug, Clone)]
pub struct SectionPlate {
    pub kind: SectionKind,
    /// Declaration order; the lowest wins where plates overlap.
    pub order: usize,
    pub center: Vec2,
    pub half_size: Vec2,
    pub color: u32,
}

impl SectionPlate {
    pub fn from_config(config: &SectionConfig, order: usize) -> Self {
        Self {
            kind: config.kind,
            order,
            center: Vec2::from_array(config.center),
            half_size: Vec2::from_array(config.size) * 0.5,
            color: config.color,
        }
    }

    /// Strictly inside on the ground plane; the edge itself does not count.
    pub fn contains(&self, position: Vec3) -> bool {
        let min = self.center - self.half_size;
        let max = self.center + self.half_size;
        position.x > min.x && position.x < max.x && position.z > min.y && position.z < max.y
    }
}
