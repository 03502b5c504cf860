use crate::components::{Pose, VehicleBody};
use crate::config::PhysicsTuning;
use crate::math::directions_from_yaw;

/// Below this speed the car can never be drifting.
const DRIFT_MIN_SPEED: f32 = 0.1;
const TILT_BLEND_SPEED: f32 = 1.5;
const TILT_DRIFTING: f32 = 0.4;
const TILT_GRIPPING: f32 = 0.15;
const TILT_SCALE: f32 = 0.3;
const TILT_SMOOTHING: f32 = 0.1;

impl VehicleBody {
    /// Angle between the forward vector and the direction of travel, in
    /// [0, π]. Thrust pushes along `-forward`, so plain nose-first driving
    /// reads close to π.
    pub fn slip_angle(&self, yaw: f32) -> f32 {
        let speed = self.speed();
        if speed <= f32::EPSILON {
            return 0.0;
        }
        let (forward, _) = directions_from_yaw(yaw);
        let dot = forward.dot(self.velocity / speed);
        dot.clamp(-1.0, 1.0).acos()
    }

    /// Enter a drift only when fast, turning and sliding at once; leave it as
    /// soon as the turn input stops.
    pub fn update_drift(&mut self, yaw: f32, turning: bool, tuning: &PhysicsTuning) {
        let was_drifting = self.is_drifting;
        let speed = self.speed();

        if speed > DRIFT_MIN_SPEED {
            let angle_diff = self.slip_angle(yaw);
            let should_drift = speed > tuning.drift_threshold
                && turning
                && angle_diff > tuning.drift_angle_threshold;

            if should_drift && !self.is_drifting {
                self.is_drifting = true;
            } else if !turning && self.is_drifting {
                self.is_drifting = false;
            }
        } else {
            self.is_drifting = false;
        }

        if self.is_drifting != was_drifting {
            tracing::debug!(drifting = self.is_drifting, speed, "drift state changed");
        }
    }

    /// Visual roll toward the turn; stronger while drifting. `turn_direction`
    /// is in [-1, 1], positive for left.
    pub fn update_tilt(&mut self, pose: &mut Pose, turn_direction: f32) {
        let speed_factor = (self.speed() / TILT_BLEND_SPEED).min(1.0);
        let magnitude = if self.is_drifting {
            TILT_DRIFTING
        } else {
            TILT_GRIPPING
        };
        self.drift_angle = turn_direction * magnitude * speed_factor;

        let target_tilt = self.drift_angle * TILT_SCALE;
        pose.tilt += (target_tilt - pose.tilt) * TILT_SMOOTHING;
    }
}
