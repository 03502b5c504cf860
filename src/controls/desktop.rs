use sdl2::keyboard::Scancode;

use super::{CarHandle, ControlMapper, ControlOutcome, InputSurface};
use crate::engine::input::InputEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldKeys {
    engine: bool,
    brake: bool,
    left: bool,
    right: bool,
}

/// Keyboard driving. Keys are tracked from press/release edges, so a key held
/// while the car is locked still counts once it unlocks.
#[derive(Debug, Default)]
pub struct DesktopKeyMapper {
    keys: HeldKeys,
}

impl DesktopKeyMapper {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_slot(&mut self, scancode: Scancode) -> Option<&mut bool> {
        match scancode {
            Scancode::W | Scancode::Up => Some(&mut self.keys.engine),
            Scancode::S | Scancode::Down => Some(&mut self.keys.brake),
            Scancode::A | Scancode::Left => Some(&mut self.keys.left),
            Scancode::D | Scancode::Right => Some(&mut self.keys.right),
            _ => None,
        }
    }
}

impl ControlMapper for DesktopKeyMapper {
    fn handle_event(&mut self, event: &InputEvent) -> bool {
        let (scancode, down) = match *event {
            InputEvent::KeyPressed(sc) => (sc, true),
            InputEvent::KeyReleased(sc) => (sc, false),
            _ => return false,
        };
        match self.key_slot(scancode) {
            Some(slot) => {
                *slot = down;
                true
            }
            None => false,
        }
    }

    fn update(&mut self, car: Option<CarHandle<'_>>) -> ControlOutcome {
        let Some(mut car) = car else {
            return ControlOutcome::default();
        };
        let keys = self.keys;

        if keys.engine {
            car.accelerate(1.0);
        }
        if keys.brake {
            car.brake(1.0);
        }
        if keys.left {
            car.turn_left(1.0);
        }
        if keys.right {
            car.turn_right(1.0);
        }

        let turning = keys.left || keys.right;
        car.update_drift(turning);

        let tilt = if keys.left {
            1.0
        } else if keys.right {
            -1.0
        } else {
            0.0
        };
        car.update_tilt(tilt);

        ControlOutcome {
            moving: keys.engine || keys.brake,
            turning,
        }
    }

    fn surface(&self) -> InputSurface {
        let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
        InputSurface {
            throttle: axis(self.keys.engine, self.keys.brake),
            steer: axis(self.keys.left, self.keys.right),
            active_pointer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Pose, VehicleBody};
    use crate::config::PhysicsTuning;
    use glam::Vec3;

    fn press(mapper: &mut DesktopKeyMapper, sc: Scancode) {
        assert!(mapper.handle_event(&InputEvent::KeyPressed(sc)));
    }

    #[test]
    fn unmapped_keys_are_not_consumed() {
        let mut mapper = DesktopKeyMapper::new();
        assert!(!mapper.handle_event(&InputEvent::KeyPressed(Scancode::Return)));
        assert_eq!(mapper.surface(), InputSurface::default());
    }

    #[test]
    fn arrows_and_wasd_share_slots() {
        let mut mapper = DesktopKeyMapper::new();
        press(&mut mapper, Scancode::Up);
        press(&mut mapper, Scancode::A);
        let surface = mapper.surface();
        assert_eq!(surface.throttle, 1.0);
        assert_eq!(surface.steer, 1.0);

        mapper.handle_event(&InputEvent::KeyReleased(Scancode::W));
        assert_eq!(mapper.surface().throttle, 0.0);
    }

    #[test]
    fn throttle_and_left_drive_the_car() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        let mut mapper = DesktopKeyMapper::new();
        press(&mut mapper, Scancode::W);
        press(&mut mapper, Scancode::Left);

        let outcome = mapper.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));

        assert_eq!(outcome, ControlOutcome { moving: true, turning: true });
        assert!((body.force.z - tuning.engine_force).abs() < 1e-5);
        assert!(body.torque > 0.0);
        assert!(body.flags.accelerating && body.flags.turning);
    }

    #[test]
    fn idle_keys_do_nothing() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        let mut mapper = DesktopKeyMapper::new();

        let outcome = mapper.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));

        assert_eq!(outcome, ControlOutcome::default());
        assert_eq!(body.force, Vec3::ZERO);
        assert_eq!(body.torque, 0.0);
    }

    #[test]
    fn brake_key_reverses_from_rest() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        let mut mapper = DesktopKeyMapper::new();
        press(&mut mapper, Scancode::S);

        mapper.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));
        assert!(body.flags.reversing);
        assert!(!body.flags.braking);
    }
}
