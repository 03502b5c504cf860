use hecs::{Entity, World};

use crate::config::Tuning;
use crate::scene::prefabs::{spawn_car, spawn_section_plate};

/// Populate the world with the section plates and the (still loading) car.
/// Returns the car entity.
pub fn load_portfolio_scene(world: &mut World, tuning: &Tuning) -> Entity {
    for (order, section) in tuning.sections.iter().enumerate() {
        spawn_section_plate(world, section, order);
    }

    let car = spawn_car(world, &tuning.physics, &tuning.car, tuning.ui.loading_delay_ms);
    tracing::info!(plates = tuning.sections.len(), "scene loaded");
    car
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Car, PendingModel, Pose, SectionPlate, VehicleBody};

    #[test]
    fn scene_has_one_car_and_every_plate() {
        let tuning = Tuning::default();
        let mut world = World::new();
        let car = load_portfolio_scene(&mut world, &tuning);

        assert_eq!(world.query::<&SectionPlate>().iter().count(), tuning.sections.len());
        assert_eq!(world.query::<(&Car, &VehicleBody)>().iter().count(), 1);
        assert!(world.get::<&PendingModel>(car).is_ok());
        assert!(world.get::<&Pose>(car).is_err());
    }
}
