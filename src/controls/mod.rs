mod desktop;
mod joystick;
mod touch_dial;

pub use desktop::DesktopKeyMapper;
pub use joystick::JoystickMapper;
pub use touch_dial::{DialGeometry, TouchSteeringMapper};

use glam::Vec2;
use hecs::World;

use crate::components::{Car, Pose, VehicleBody};
use crate::config::{PhysicsTuning, Tuning, WorldBounds};
use crate::engine::input::InputEvent;

// ---------------------------------------------------------------------------
// Scheme selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ControlScheme {
    /// Keyboard: W/S/A/D or arrow keys.
    Desktop,
    /// Rotating steering dial with auto-throttle.
    Dial,
    /// Displacement joystick.
    Joystick,
}

impl ControlScheme {
    pub fn is_touch(self) -> bool {
        !matches!(self, Self::Desktop)
    }
}

/// How the dial turns into steering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DialSteering {
    /// Steering torque proportional to the dial deflection.
    Torque,
    /// Chase a target heading offset from the heading at touch-down.
    #[value(name = "direct")]
    DirectRotation,
}

pub fn build_mapper(
    scheme: ControlScheme,
    steering: DialSteering,
    tuning: &Tuning,
    viewport: (u32, u32),
) -> Box<dyn ControlMapper> {
    tracing::debug!(?scheme, ?steering, "control scheme selected");
    match scheme {
        ControlScheme::Desktop => Box::new(DesktopKeyMapper::new()),
        ControlScheme::Dial => {
            Box::new(TouchSteeringMapper::new(&tuning.mobile, steering, viewport))
        }
        ControlScheme::Joystick => Box::new(JoystickMapper::new(&tuning.mobile, viewport)),
    }
}

// ---------------------------------------------------------------------------
// Mapper interface
// ---------------------------------------------------------------------------

/// What a mapper did with the car this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlOutcome {
    pub moving: bool,
    pub turning: bool,
}

/// Normalised view of the mapper's input state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSurface {
    /// -1 (full brake/reverse) to 1 (full throttle).
    pub throttle: f32,
    /// -1 to 1, positive for left.
    pub steer: f32,
    pub active_pointer: Option<i64>,
}

/// On-screen touch control, for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOverlay {
    pub center: Vec2,
    pub radius: f32,
    pub thumb: Vec2,
    pub thumb_radius: f32,
    pub active: bool,
}

pub trait ControlMapper {
    /// Feed one input edge. Returns true when the control consumed it.
    fn handle_event(&mut self, event: &InputEvent) -> bool;

    /// Turn the held input into forces on the car. `None` means the car is
    /// not drivable yet (or locked) and nothing happens.
    fn update(&mut self, car: Option<CarHandle<'_>>) -> ControlOutcome;

    fn surface(&self) -> InputSurface;

    fn overlay(&self) -> Option<ControlOverlay> {
        None
    }
}

// ---------------------------------------------------------------------------
// Car access
// ---------------------------------------------------------------------------

/// Borrow of the car's body and pose for one mapper update.
pub struct CarHandle<'a> {
    body: &'a mut VehicleBody,
    pose: &'a mut Pose,
    tuning: &'a PhysicsTuning,
    pub at_boundary: bool,
}

impl<'a> CarHandle<'a> {
    pub fn new(
        body: &'a mut VehicleBody,
        pose: &'a mut Pose,
        tuning: &'a PhysicsTuning,
        at_boundary: bool,
    ) -> Self {
        Self {
            body,
            pose,
            tuning,
            at_boundary,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.pose.yaw
    }

    pub fn speed(&self) -> f32 {
        self.body.speed()
    }

    pub fn accelerate(&mut self, intensity: f32) {
        self.body.accelerate(self.pose.yaw, intensity, self.tuning);
    }

    pub fn brake(&mut self, intensity: f32) {
        self.body.brake(self.pose.yaw, intensity, self.tuning);
    }

    pub fn steer(&mut self, direction: f32, intensity: f32) {
        self.body
            .apply_steering_torque(self.pose.yaw, direction, intensity, self.tuning);
    }

    pub fn turn_left(&mut self, intensity: f32) {
        self.body.turn_left(self.pose.yaw, intensity, self.tuning);
    }

    pub fn turn_right(&mut self, intensity: f32) {
        self.body.turn_right(self.pose.yaw, intensity, self.tuning);
    }

    pub fn set_target_rotation(&mut self, target: f32, lerp: f32) {
        self.body
            .set_target_rotation(self.pose.yaw, target, lerp, self.tuning);
    }

    pub fn update_drift(&mut self, turning: bool) {
        self.body.update_drift(self.pose.yaw, turning, self.tuning);
    }

    pub fn update_tilt(&mut self, turn_direction: f32) {
        self.body.update_tilt(&mut *self.pose, turn_direction);
    }
}

/// Runs the mapper against the car. A car without a pose, or a locked car,
/// gets `update(None)`.
///
/// A locked car has no turn input, so it leaves any drift and its tilt
/// settles back to level.
pub fn control_system(
    world: &mut World,
    mapper: &mut dyn ControlMapper,
    tuning: &PhysicsTuning,
    bounds: &WorldBounds,
    locked: bool,
) -> ControlOutcome {
    let car = world
        .query_mut::<(&mut VehicleBody, &mut Pose)>()
        .with::<&Car>()
        .into_iter()
        .next()
        .map(|(_, (body, pose))| {
            let at_boundary = bounds.is_near_edge(pose.position, tuning.boundary_proximity);
            CarHandle::new(body, pose, tuning, at_boundary)
        });

    if locked {
        if let Some(mut car) = car {
            car.update_drift(false);
            car.update_tilt(0.0);
        }
        return mapper.update(None);
    }

    mapper.update(car)
}
