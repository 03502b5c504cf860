use hecs::{Entity, World};

use crate::components::*;
use crate::config::{CarTuning, PhysicsTuning, SectionConfig};

/// Spawn the player car. It has no [`Pose`] until the model "loads", so
/// controls and physics leave it alone until then.
pub fn spawn_car(
    world: &mut World,
    physics: &PhysicsTuning,
    car: &CarTuning,
    loading_delay_ms: u64,
) -> Entity {
    let start = car.start_position();
    world.spawn((
        Car,
        VehicleBody::new(physics),
        Telemetry {
            position: start,
            yaw: car.start_yaw,
            ..Default::default()
        },
        PendingModel {
            remaining_ms: loading_delay_ms as f32,
        },
    ))
}

pub fn spawn_section_plate(world: &mut World, config: &SectionConfig, order: usize) -> Entity {
    world.spawn((SectionPlate::from_config(config, order),))
}
