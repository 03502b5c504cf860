use glam::Vec3;
use hecs::World;

use crate::components::{Car, Pose, Telemetry, VehicleBody};
use crate::config::{PhysicsTuning, WorldBounds};
use crate::math::directions_from_yaw;

/// Traction lost on top of the speed falloff while sliding.
const DRIFT_TRACTION_FACTOR: f32 = 0.7;
const DRAG_MIN_SPEED: f32 = 0.001;
const LATERAL_MIN_SPEED: f32 = 0.01;
const DRAG_SCALE: f32 = 0.01;
const LATERAL_GRIP_SCALE: f32 = 0.1;
/// Distance kept between the car and the boundary after clamping.
const EDGE_MARGIN: f32 = 0.5;
const COLLISION_SPIN_DAMPING: f32 = 0.5;
const WEIGHT_RELAX_RATE: f32 = 0.1;

/// Speed-dependent grip, further reduced while drifting.
pub fn calculate_traction(body: &mut VehicleBody, tuning: &PhysicsTuning) -> f32 {
    let speed_ratio = body.speed() / tuning.max_speed;
    let traction_loss = speed_ratio * tuning.traction_speed_falloff;
    body.traction = tuning
        .min_traction
        .max(tuning.traction_coefficient - traction_loss);

    if body.is_drifting {
        body.traction *= DRIFT_TRACTION_FACTOR;
    }
    body.traction
}

/// Quadratic air drag magnitude at `speed`.
pub fn drag_magnitude(speed: f32, mass: f32, tuning: &PhysicsTuning) -> f32 {
    tuning.drag_coefficient * speed * speed * mass * DRAG_SCALE
}

/// Air drag plus constant rolling resistance, both opposing motion.
pub fn apply_drag_forces(body: &mut VehicleBody, tuning: &PhysicsTuning) {
    let speed = body.speed();
    if speed < DRAG_MIN_SPEED {
        return;
    }
    let direction = body.velocity / speed;

    let drag = drag_magnitude(speed, body.mass, tuning);
    body.apply_force(-direction * drag);
    body.apply_force(-direction * tuning.rolling_resistance);
}

/// Tire grip opposing sideways slip. Weakened while drifting so the car slides.
pub fn apply_lateral_friction(body: &mut VehicleBody, yaw: f32, tuning: &PhysicsTuning) {
    if body.speed() < LATERAL_MIN_SPEED {
        return;
    }
    let (_, right) = directions_from_yaw(yaw);
    let lateral_velocity = right * body.velocity.dot(right);

    let mut friction = lateral_velocity * (-body.traction * body.mass * LATERAL_GRIP_SCALE);
    if body.is_drifting {
        friction *= tuning.drift_momentum_preservation;
    }
    body.apply_force(friction);
}

/// `a = F / m`, `α = τ / I`, then angular drag and the yaw-rate clamp.
pub fn integrate_forces(body: &mut VehicleBody, tuning: &PhysicsTuning) {
    body.acceleration = body.force / body.mass;
    body.velocity += body.acceleration;

    body.angular_acceleration = body.torque / body.moment_of_inertia;
    body.angular_velocity += body.angular_acceleration;
    body.angular_velocity *= tuning.angular_drag;

    let max = tuning.max_angular_velocity;
    body.angular_velocity = body.angular_velocity.clamp(-max, max);
}

/// Cap forward and reverse speed separately. Direction is preserved.
pub fn limit_speed(body: &mut VehicleBody, yaw: f32, tuning: &PhysicsTuning) {
    let forward_speed = body.forward_speed(yaw);
    let speed = body.speed();

    if forward_speed > 0.0 && speed > tuning.max_speed {
        body.velocity *= tuning.max_speed / speed;
    }
    if forward_speed < 0.0 && speed > tuning.max_reverse_speed {
        body.velocity *= tuning.max_reverse_speed / speed;
    }
}

/// Move the car by one frame of velocity, bouncing off the world rectangle.
/// Returns false when either axis hit a wall this frame.
pub fn resolve_boundaries(
    body: &mut VehicleBody,
    pose: &mut Pose,
    bounds: &WorldBounds,
    tuning: &PhysicsTuning,
) -> bool {
    let new_x = pose.position.x + body.velocity.x;
    let new_z = pose.position.z + body.velocity.z;

    let mut collided = false;

    if new_x < bounds.min_x || new_x > bounds.max_x {
        body.velocity.x *= tuning.bounce_damping;
        body.velocity.z *= tuning.collision_friction;
        body.angular_velocity *= COLLISION_SPIN_DAMPING;
        collided = true;
    }

    if new_z < bounds.min_z || new_z > bounds.max_z {
        body.velocity.z *= tuning.bounce_damping;
        body.velocity.x *= tuning.collision_friction;
        body.angular_velocity *= COLLISION_SPIN_DAMPING;
        collided = true;
    }

    pose.position.x = new_x.clamp(bounds.min_x + EDGE_MARGIN, bounds.max_x - EDGE_MARGIN);
    pose.position.z = new_z.clamp(bounds.min_z + EDGE_MARGIN, bounds.max_z - EDGE_MARGIN);

    !collided
}

pub fn clear_forces(body: &mut VehicleBody) {
    body.force = Vec3::ZERO;
    body.torque = 0.0;
    body.acceleration = Vec3::ZERO;
    body.angular_acceleration = 0.0;
}

/// One simulation step. Stage order matters: each reads the previous output.
/// Returns whether the car moved freely (false if it hit the boundary).
pub fn step_vehicle(
    body: &mut VehicleBody,
    pose: &mut Pose,
    tuning: &PhysicsTuning,
    bounds: &WorldBounds,
) -> bool {
    calculate_traction(body, tuning);

    apply_drag_forces(body, tuning);
    apply_lateral_friction(body, pose.yaw, tuning);

    integrate_forces(body, tuning);
    limit_speed(body, pose.yaw, tuning);

    pose.yaw += body.angular_velocity;

    let moved = resolve_boundaries(body, pose, bounds, tuning);

    clear_forces(body);
    body.weight.relax(WEIGHT_RELAX_RATE);
    body.flags = Default::default();

    moved
}

/// Steps the car and refreshes its [`Telemetry`]. Does nothing until the
/// car's pose exists. Returns the step result.
pub fn vehicle_physics_system(
    world: &mut World,
    tuning: &PhysicsTuning,
    bounds: &WorldBounds,
) -> bool {
    let mut moved = false;
    for (_entity, (body, pose, telemetry)) in world
        .query_mut::<(&mut VehicleBody, &mut Pose, &mut Telemetry)>()
        .with::<&Car>()
    {
        // The step clears these; the HUD reads this frame's values.
        let flags = body.flags;
        let steering = body.steering_angle;
        moved = step_vehicle(body, pose, tuning, bounds);

        *telemetry = Telemetry {
            position: pose.position,
            yaw: pose.yaw,
            tilt: pose.tilt,
            velocity: body.velocity,
            speed: body.speed(),
            steering,
            drifting: body.is_drifting,
            flags,
            at_boundary: bounds.is_near_edge(pose.position, tuning.boundary_proximity),
            moved,
        };
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn frictionless() -> PhysicsTuning {
        PhysicsTuning {
            drag_coefficient: 0.0,
            rolling_resistance: 0.0,
            ..PhysicsTuning::default()
        }
    }

    fn car_at(tuning: &PhysicsTuning, position: Vec3, yaw: f32) -> (VehicleBody, Pose) {
        (VehicleBody::new(tuning), Pose::new(position, yaw))
    }

    #[test]
    fn no_input_means_no_motion() {
        let tuning = PhysicsTuning::default();
        let bounds = WorldBounds::default();
        let (mut body, mut pose) = car_at(&tuning, Vec3::new(3.0, 1.0, -2.0), 0.4);
        for _ in 0..120 {
            assert!(step_vehicle(&mut body, &mut pose, &tuning, &bounds));
        }
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(pose.position, Vec3::new(3.0, 1.0, -2.0));
        assert_eq!(pose.yaw, 0.4);
    }

    #[test]
    fn drag_is_monotonic_in_speed() {
        let tuning = PhysicsTuning::default();
        let mut last = 0.0;
        for i in 0..100 {
            let drag = drag_magnitude(i as f32 * 0.05, 1000.0, &tuning);
            assert!(drag >= last);
            last = drag;
        }
    }

    #[test]
    fn integrate_then_clear_zeroes_accumulators() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        body.apply_force(Vec3::new(12.0, 0.0, -4.0));
        body.apply_force(Vec3::new(-1.0, 0.0, 9.0));
        body.apply_torque(3.5);
        integrate_forces(&mut body, &tuning);
        clear_forces(&mut body);
        assert_eq!(body.force, Vec3::ZERO);
        assert_eq!(body.torque, 0.0);
        assert_eq!(body.acceleration, Vec3::ZERO);
        assert_eq!(body.angular_acceleration, 0.0);
    }

    #[test]
    fn speed_clamp_preserves_direction() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        // yaw 0: nose-first travel is +Z
        let original = Vec3::new(1.0, 0.0, 4.0);
        body.velocity = original;
        limit_speed(&mut body, 0.0, &tuning);
        assert!((body.speed() - tuning.max_speed).abs() < 1e-5);
        assert!(body.velocity.normalize().dot(original.normalize()) > 0.99999);
    }

    #[test]
    fn reverse_speed_clamp() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        body.velocity = Vec3::new(0.0, 0.0, -2.0);
        limit_speed(&mut body, 0.0, &tuning);
        assert!((body.speed() - tuning.max_reverse_speed).abs() < 1e-5);
    }

    #[test]
    fn one_frame_of_thrust_from_rest() {
        let tuning = PhysicsTuning {
            car_mass: 1000.0,
            engine_force: 15.0,
            ..frictionless()
        };
        let mut body = VehicleBody::new(&tuning);
        body.accelerate(0.3, 1.0, &tuning);
        integrate_forces(&mut body, &tuning);
        assert!((body.speed() - 0.015).abs() < 1e-6);
        assert!((body.forward_speed(0.3) - 0.015).abs() < 1e-6);
    }

    #[test]
    fn bounces_off_the_max_x_wall() {
        let tuning = frictionless();
        let bounds = WorldBounds::default();
        // yaw π/2 points the thrust along +X, so there is no lateral slip.
        let (mut body, mut pose) =
            car_at(&tuning, Vec3::new(bounds.max_x - 0.01, 1.0, 0.0), FRAC_PI_2);
        body.velocity = Vec3::new(0.5, 0.0, 0.0);

        let moved = step_vehicle(&mut body, &mut pose, &tuning, &bounds);

        assert!(!moved);
        assert!(body.velocity.x < 0.0);
        assert!((body.velocity.x.abs() - 0.5 * tuning.bounce_damping.abs()).abs() < 1e-5);
        assert!(pose.position.x <= bounds.max_x - 0.5);
    }

    #[test]
    fn wall_hit_damps_parallel_velocity_and_spin() {
        let tuning = frictionless();
        let bounds = WorldBounds::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::new(0.0, 1.0, bounds.min_z + 0.2), 0.0);
        body.velocity = Vec3::new(0.4, 0.0, -0.5);
        body.angular_velocity = 0.04;

        assert!(!resolve_boundaries(&mut body, &mut pose, &bounds, &tuning));
        assert!((body.velocity.z - 0.15).abs() < 1e-5);
        assert!((body.velocity.x - 0.28).abs() < 1e-5);
        assert!((body.angular_velocity - 0.02).abs() < 1e-6);
        assert_eq!(pose.position.z, bounds.min_z + 0.5);
    }

    #[test]
    fn angular_velocity_is_clamped() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        body.apply_torque(1.0e6);
        integrate_forces(&mut body, &tuning);
        assert_eq!(body.angular_velocity, tuning.max_angular_velocity);
    }

    #[test]
    fn drifting_cuts_traction() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let grip = calculate_traction(&mut body, &tuning);
        body.is_drifting = true;
        let sliding = calculate_traction(&mut body, &tuning);
        assert!((sliding - grip * 0.7).abs() < 1e-6);
    }

    #[test]
    fn traction_never_drops_below_minimum_when_gripping() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        body.velocity = Vec3::new(0.0, 0.0, 50.0);
        assert_eq!(calculate_traction(&mut body, &tuning), tuning.min_traction);
    }

    #[test]
    fn lateral_friction_opposes_slip() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let (_, right) = directions_from_yaw(0.0);
        body.velocity = right * 0.5;
        apply_lateral_friction(&mut body, 0.0, &tuning);
        assert!(body.force.dot(right) < 0.0);
    }

    #[test]
    fn drifting_keeps_most_lateral_momentum() {
        let tuning = PhysicsTuning::default();
        let (_, right) = directions_from_yaw(0.0);

        let mut gripping = VehicleBody::new(&tuning);
        gripping.velocity = right * 0.5;
        gripping.traction = 0.8;
        apply_lateral_friction(&mut gripping, 0.0, &tuning);

        let mut drifting = VehicleBody::new(&tuning);
        drifting.velocity = right * 0.5;
        drifting.traction = 0.8;
        drifting.is_drifting = true;
        apply_lateral_friction(&mut drifting, 0.0, &tuning);

        let expected = gripping.force * tuning.drift_momentum_preservation;
        assert!((drifting.force - expected).length() < 1e-5);
        assert!(drifting.force.length() < gripping.force.length());
    }

    #[test]
    fn lateral_friction_skips_a_near_stationary_car() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let (_, right) = directions_from_yaw(0.0);
        body.velocity = right * 0.005;
        apply_lateral_friction(&mut body, 0.0, &tuning);
        assert_eq!(body.force, Vec3::ZERO);

        body.velocity = right * 0.02;
        apply_lateral_friction(&mut body, 0.0, &tuning);
        assert!(body.force.dot(right) < 0.0);
    }

    #[test]
    fn drag_skips_a_near_stationary_car() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        body.velocity = Vec3::new(0.0005, 0.0, 0.0);
        apply_drag_forces(&mut body, &tuning);
        assert_eq!(body.force, Vec3::ZERO);

        body.velocity = Vec3::new(0.002, 0.0, 0.0);
        apply_drag_forces(&mut body, &tuning);
        assert!(body.force.x < 0.0);
    }

    #[test]
    fn step_clears_flags_and_relaxes_weight() {
        let tuning = PhysicsTuning::default();
        let bounds = WorldBounds::default();
        let (mut body, mut pose) = car_at(&tuning, Vec3::ZERO, 0.0);
        body.accelerate(pose.yaw, 1.0, &tuning);
        step_vehicle(&mut body, &mut pose, &tuning, &bounds);
        assert_eq!(body.flags, Default::default());
        assert!((body.weight.rear - 0.59).abs() < 1e-6);
        assert_eq!(body.force, Vec3::ZERO);
    }

    #[test]
    fn system_waits_for_pose() {
        let tuning = PhysicsTuning::default();
        let bounds = WorldBounds::default();
        let mut world = World::new();
        let car = world.spawn((Car, VehicleBody::new(&tuning), Telemetry::default()));
        assert!(!vehicle_physics_system(&mut world, &tuning, &bounds));

        world
            .insert_one(car, Pose::new(Vec3::new(0.0, 1.0, 0.0), 0.0))
            .unwrap();
        world.get::<&mut VehicleBody>(car).unwrap().accelerate(0.0, 1.0, &tuning);
        assert!(vehicle_physics_system(&mut world, &tuning, &bounds));

        let telemetry = *world.get::<&Telemetry>(car).unwrap();
        assert!(telemetry.flags.accelerating);
        assert!(telemetry.speed > 0.0);
    }
}
