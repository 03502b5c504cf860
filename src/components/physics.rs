use glam::Vec3;

use crate::config::PhysicsTuning;

/// Single-frame control flags. Set by the force methods, cleared at the end of
/// every physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveFlags {
    pub accelerating: bool,
    pub braking: bool,
    pub turning: bool,
    pub reversing: bool,
}

/// Cosmetic load distribution. Each field relaxes toward 0.5 every frame and
/// never feeds back into the forces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTransfer {
    pub front: f32,
    pub rear: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for WeightTransfer {
    fn default() -> Self {
        Self {
            front: 0.5,
            rear: 0.5,
            left: 0.5,
            right: 0.5,
        }
    }
}

impl WeightTransfer {
    pub fn relax(&mut self, rate: f32) {
        for value in [&mut self.front, &mut self.rear, &mut self.left, &mut self.right] {
            *value += (0.5 - *value) * rate;
        }
    }
}

/// Rigid-body-lite state of the car. Position and yaw live on [`super::Pose`].
///
/// Force and torque accumulate between the control pass and the end of the
/// physics step; outside that window both are zero.
#[derive(Debug, Clone)]
pub struct VehicleBody {
    pub mass: f32,
    pub moment_of_inertia: f32,

    /// World-space velocity per frame. `y` is always 0.
    pub velocity: Vec3,
    /// Yaw rate, radians per frame.
    pub angular_velocity: f32,

    pub force: Vec3,
    pub torque: f32,
    pub acceleration: Vec3,
    pub angular_acceleration: f32,

    pub traction: f32,
    pub is_drifting: bool,
    /// Roll target derived from turn input; visual only.
    pub drift_angle: f32,
    pub steering_angle: f32,

    pub weight: WeightTransfer,
    pub flags: DriveFlags,
}

impl VehicleBody {
    pub fn new(tuning: &PhysicsTuning) -> Self {
        Self {
            mass: tuning.car_mass,
            moment_of_inertia: tuning.moment_of_inertia,
            velocity: Vec3::ZERO,
            angular_velocity: 0.0,
            force: Vec3::ZERO,
            torque: 0.0,
            acceleration: Vec3::ZERO,
            angular_acceleration: 0.0,
            traction: tuning.traction_coefficient,
            is_drifting: false,
            drift_angle: 0.0,
            steering_angle: 0.0,
            weight: WeightTransfer::default(),
            flags: DriveFlags::default(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
