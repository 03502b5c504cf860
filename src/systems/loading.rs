use hecs::{Entity, World};

use crate::components::{PendingModel, Pose, Telemetry};
use crate::config::CarTuning;

/// Counts down [`PendingModel`] timers and attaches the start pose once one
/// runs out. Returns the entities that became drivable this frame.
pub fn model_loading_system(world: &mut World, dt_ms: f32, car: &CarTuning) -> Vec<Entity> {
    let mut ready = Vec::new();
    for (entity, pending) in world.query_mut::<&mut PendingModel>() {
        pending.remaining_ms -= dt_ms;
        if pending.remaining_ms <= 0.0 {
            ready.push(entity);
        }
    }

    for &entity in &ready {
        let pose = Pose::new(car.start_position(), car.start_yaw);
        let _ = world.remove_one::<PendingModel>(entity);
        let _ = world.insert_one(entity, pose);
        if let Ok(mut telemetry) = world.get::<&mut Telemetry>(entity) {
            telemetry.position = pose.position;
            telemetry.yaw = pose.yaw;
        }
        tracing::info!(position = ?pose.position, yaw = pose.yaw, "car model attached");
    }
    ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::scene::prefabs::spawn_car;

    #[test]
    fn pose_appears_after_the_delay() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let car = spawn_car(&mut world, &tuning.physics, &tuning.car, 1000);

        assert!(model_loading_system(&mut world, 600.0, &tuning.car).is_empty());
        assert!(world.get::<&Pose>(car).is_err());

        assert_eq!(model_loading_system(&mut world, 400.0, &tuning.car), vec![car]);
        let pose = *world.get::<&Pose>(car).unwrap();
        assert_eq!(pose.position, tuning.car.start_position());
        assert_eq!(pose.yaw, tuning.car.start_yaw);
        assert!(world.get::<&PendingModel>(car).is_err());

        assert!(model_loading_system(&mut world, 16.0, &tuning.car).is_empty());
    }
}
