use glam::Vec3;

use crate::components::VehicleBody;
use crate::config::PhysicsTuning;
use crate::math::{directions_from_yaw, normalize_angle};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Forward speed at or above which the brake pedal brakes instead of reversing.
const BRAKE_REVERSE_SPLIT: f32 = 0.05;
/// Forward speed below which steering flips to match reversing wheels.
const REVERSE_STEER_SPEED: f32 = -0.1;
/// Speed at which steering has fully handed over from torque to lateral force.
const STEERING_BLEND_SPEED: f32 = 1.5;
const STEERING_REGIME_MIN: f32 = 0.1;
const DIRECT_TORQUE_SHARE: f32 = 0.5;
const LATERAL_TORQUE_SHARE: f32 = 0.3;
const TARGET_ROTATION_TORQUE: f32 = 0.8;
const TARGET_ROTATION_DEADBAND: f32 = 0.05;

// ---------------------------------------------------------------------------
// Force and torque application
// ---------------------------------------------------------------------------

impl VehicleBody {
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Positive when travelling nose-first, negative when reversing.
    pub fn forward_speed(&self, yaw: f32) -> f32 {
        let (forward, _) = directions_from_yaw(yaw);
        -self.velocity.dot(forward)
    }

    /// Engine thrust, `intensity` in [0, 1].
    pub fn accelerate(&mut self, yaw: f32, intensity: f32, tuning: &PhysicsTuning) {
        let (forward, _) = directions_from_yaw(yaw);
        let engine_force = tuning.engine_force * tuning.engine_force_multiplier * intensity;
        self.apply_force(-forward * engine_force);

        self.weight.rear = 0.6;
        self.weight.front = 0.4;

        self.flags.accelerating = true;
        self.flags.reversing = false;
    }

    /// Brakes while rolling forward, otherwise reverses up to
    /// `max_reverse_speed`.
    pub fn brake(&mut self, yaw: f32, intensity: f32, tuning: &PhysicsTuning) {
        let (forward, _) = directions_from_yaw(yaw);
        let forward_speed = -self.velocity.dot(forward);

        if forward_speed >= BRAKE_REVERSE_SPLIT {
            let brake_force = tuning.brake_force * tuning.engine_force_multiplier * intensity;
            let direction = self.velocity.normalize_or_zero();
            self.apply_force(-direction * brake_force);

            self.weight.front = 0.7;
            self.weight.rear = 0.3;

            self.flags.braking = true;
            self.flags.reversing = false;
        } else {
            let reverse_speed = forward_speed.min(0.0).abs();
            if reverse_speed < tuning.max_reverse_speed {
                let reverse_force =
                    tuning.reverse_force * tuning.engine_force_multiplier * intensity;
                // +forward moves the car backwards.
                self.apply_force(forward * reverse_force);
            }

            self.weight.front = 0.4;
            self.weight.rear = 0.6;

            self.flags.braking = false;
            self.flags.reversing = true;
        }
    }

    /// Blend of direct yaw torque (low speed) and lateral force plus a smaller
    /// torque (high speed). `direction` is +1 for left, -1 for right, or any
    /// value in between.
    pub fn apply_steering_torque(
        &mut self,
        yaw: f32,
        direction: f32,
        intensity: f32,
        tuning: &PhysicsTuning,
    ) {
        let speed = self.speed();
        let speed_factor = (speed / STEERING_BLEND_SPEED).min(1.0);
        let low_speed_share = 1.0 - speed_factor;
        let high_speed_share = speed_factor;

        let steering_force = tuning.steering_force * tuning.steering_force_multiplier * intensity;

        let steering_direction = if self.forward_speed(yaw) < REVERSE_STEER_SPEED {
            -direction
        } else {
            direction
        };

        if low_speed_share > STEERING_REGIME_MIN {
            self.apply_torque(
                steering_direction * steering_force * DIRECT_TORQUE_SHARE * low_speed_share,
            );
        }

        if high_speed_share > STEERING_REGIME_MIN && speed > STEERING_REGIME_MIN {
            let (_, right) = directions_from_yaw(yaw);
            self.apply_force(
                right * (steering_direction * steering_force * high_speed_share * self.traction),
            );
            self.apply_torque(
                steering_direction * steering_force * LATERAL_TORQUE_SHARE * high_speed_share,
            );
        }

        if direction > 0.0 {
            self.weight.left = 0.6;
            self.weight.right = 0.4;
        } else if direction < 0.0 {
            self.weight.left = 0.4;
            self.weight.right = 0.6;
        }

        self.steering_angle = direction * intensity;
        self.flags.turning = true;
    }

    pub fn turn_left(&mut self, yaw: f32, intensity: f32, tuning: &PhysicsTuning) {
        self.apply_steering_torque(yaw, 1.0, intensity, tuning);
    }

    pub fn turn_right(&mut self, yaw: f32, intensity: f32, tuning: &PhysicsTuning) {
        self.apply_steering_torque(yaw, -1.0, intensity, tuning);
    }

    /// Torque proportional to the shortest signed angle toward `target`.
    pub fn set_target_rotation(&mut self, yaw: f32, target: f32, lerp: f32, tuning: &PhysicsTuning) {
        let angle_diff = normalize_angle(target - yaw);

        let torque_multiplier =
            tuning.steering_force * TARGET_ROTATION_TORQUE * tuning.torque_multiplier;
        self.apply_torque(angle_diff * torque_multiplier * lerp);

        self.steering_angle = angle_diff.signum() * angle_diff.abs().min(1.0);
        self.flags.turning = angle_diff.abs() > TARGET_ROTATION_DEADBAND;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn body() -> (VehicleBody, PhysicsTuning) {
        let tuning = PhysicsTuning::default();
        (VehicleBody::new(&tuning), tuning)
    }

    #[test]
    fn zero_intensity_accelerate_adds_no_force() {
        let (mut car, tuning) = body();
        car.accelerate(0.7, 0.0, &tuning);
        assert_eq!(car.force.length(), 0.0);
        assert!(car.flags.accelerating);
    }

    #[test]
    fn accelerate_pushes_against_forward_vector() {
        let (mut car, tuning) = body();
        car.accelerate(0.0, 1.0, &tuning);
        // yaw 0: forward = -Z, so thrust is +Z
        assert!((car.force.z - tuning.engine_force).abs() < 1e-5);
        assert_eq!(car.weight.rear, 0.6);
        assert_eq!(car.weight.front, 0.4);
        assert!(!car.flags.reversing);
    }

    #[test]
    fn brake_at_rest_reverses() {
        let (mut car, tuning) = body();
        car.brake(0.0, 1.0, &tuning);
        assert!(car.flags.reversing);
        assert!(!car.flags.braking);
        // +forward = -Z at yaw 0
        assert!((car.force.z + tuning.reverse_force).abs() < 1e-5);
        assert_eq!(car.weight.rear, 0.6);
    }

    #[test]
    fn brake_while_rolling_forward_opposes_velocity() {
        let (mut car, tuning) = body();
        car.velocity = Vec3::new(0.0, 0.0, 1.0);
        car.brake(0.0, 1.0, &tuning);
        assert!(car.flags.braking);
        assert!(!car.flags.reversing);
        assert!((car.force.z + tuning.brake_force).abs() < 1e-5);
        assert_eq!(car.weight.front, 0.7);
    }

    #[test]
    fn brake_threshold_tie_brakes() {
        let (mut car, tuning) = body();
        car.velocity = Vec3::new(0.0, 0.0, BRAKE_REVERSE_SPLIT);
        car.brake(0.0, 1.0, &tuning);
        assert!(car.flags.braking);
    }

    #[test]
    fn reverse_force_stops_at_max_reverse_speed() {
        let (mut car, tuning) = body();
        car.velocity = Vec3::new(0.0, 0.0, -tuning.max_reverse_speed);
        car.brake(0.0, 1.0, &tuning);
        assert!(car.flags.reversing);
        assert_eq!(car.force, Vec3::ZERO);
    }

    #[test]
    fn standstill_steering_is_pure_torque() {
        let (mut car, tuning) = body();
        car.turn_left(0.0, 1.0, &tuning);
        assert_eq!(car.force, Vec3::ZERO);
        assert!((car.torque - tuning.steering_force * 0.5).abs() < 1e-5);
        assert_eq!(car.weight.left, 0.6);
        assert!(car.flags.turning);
        assert_eq!(car.steering_angle, 1.0);
    }

    #[test]
    fn fast_steering_adds_lateral_force() {
        let (mut car, tuning) = body();
        car.velocity = Vec3::new(0.0, 0.0, 2.0);
        car.turn_right(0.0, 1.0, &tuning);
        let (_, right) = directions_from_yaw(0.0);
        let expected = right * (-tuning.steering_force * car.traction);
        assert!((car.force - expected).length() < 1e-4);
        assert!((car.torque + tuning.steering_force * 0.3).abs() < 1e-4);
        assert_eq!(car.weight.right, 0.6);
    }

    #[test]
    fn steering_flips_when_reversing() {
        let (mut car, tuning) = body();
        // Thrust points along +Z at yaw 0, so -Z travel is reversing.
        car.velocity = Vec3::new(0.0, 0.0, -0.3);
        assert!(car.forward_speed(0.0) < REVERSE_STEER_SPEED);
        car.turn_left(0.0, 1.0, &tuning);
        assert!(car.torque < 0.0);
    }

    #[test]
    fn target_rotation_takes_shortest_arc() {
        let (mut car, tuning) = body();
        car.set_target_rotation(PI - 0.1, -PI + 0.1, 1.0, &tuning);
        assert!(car.torque > 0.0);
        assert!(car.flags.turning);
        assert!((car.steering_angle - 0.2).abs() < 1e-4);
    }

    #[test]
    fn target_rotation_deadband_clears_turning() {
        let (mut car, tuning) = body();
        car.set_target_rotation(FRAC_PI_2, FRAC_PI_2 + 0.01, 0.15, &tuning);
        assert!(!car.flags.turning);
    }
}
