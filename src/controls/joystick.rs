use glam::Vec2;

use super::{CarHandle, ControlMapper, ControlOutcome, ControlOverlay, DialGeometry, InputSurface};
use crate::config::{DialTuning, MobileTuning};
use crate::engine::input::{InputEvent, TouchPoint};

/// Thumb-stick on the touch screen: push up to drive, down to brake or
/// reverse, sideways to steer.
pub struct JoystickMapper {
    tuning: DialTuning,
    boundary_turn_assist: f32,
    horizontal_swipe_threshold: f32,
    drift_speed: f32,
    geometry: DialGeometry,
    active_touch: Option<i64>,
    /// Thumb offset from the base centre in pixels, within the track radius.
    displacement: Vec2,
}

impl JoystickMapper {
    pub fn new(mobile: &MobileTuning, viewport: (u32, u32)) -> Self {
        let tuning = mobile.dial.clone();
        let geometry = DialGeometry::from_viewport(viewport.0, viewport.1, &tuning);
        Self {
            tuning,
            boundary_turn_assist: mobile.boundary_turn_assist,
            horizontal_swipe_threshold: mobile.horizontal_swipe_threshold,
            drift_speed: mobile.drift_speed,
            geometry,
            active_touch: None,
            displacement: Vec2::ZERO,
        }
    }

    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    /// `(forward, turn)`, each in [-1, 1]. Zero inside the dead zone.
    pub fn axes(&self) -> (f32, f32) {
        if self.geometry.track_radius <= 0.0 {
            return (0.0, 0.0);
        }
        let normalized = self.displacement / self.geometry.track_radius;
        if normalized.length() < self.tuning.dead_zone {
            return (0.0, 0.0);
        }
        // Screen y grows downwards; pushing up drives forward.
        (-normalized.y, normalized.x)
    }

    fn track(&mut self, touch: &TouchPoint) {
        let offset = Vec2::new(touch.x, touch.y) - self.geometry.center;
        self.displacement = offset.clamp_length_max(self.geometry.track_radius);
    }
}

impl ControlMapper for JoystickMapper {
    fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::TouchStart(touch) => {
                if !self.geometry.contains(Vec2::new(touch.x, touch.y)) {
                    return false;
                }
                if let Some(active) = self.active_touch {
                    if active != touch.id {
                        tracing::warn!(active, ignored = touch.id, "joystick already held; ignoring touch");
                    }
                    return true;
                }
                self.active_touch = Some(touch.id);
                self.track(touch);
                true
            }
            InputEvent::TouchMove(touch) if self.active_touch == Some(touch.id) => {
                self.track(touch);
                true
            }
            InputEvent::TouchEnd(touch) | InputEvent::TouchCancel(touch)
                if self.active_touch == Some(touch.id) =>
            {
                self.active_touch = None;
                self.displacement = Vec2::ZERO;
                true
            }
            InputEvent::Resized { width, height } => {
                self.geometry = DialGeometry::from_viewport(*width, *height, &self.tuning);
                tracing::debug!(width, height, "joystick resized");
                false
            }
            _ => false,
        }
    }

    fn update(&mut self, car: Option<CarHandle<'_>>) -> ControlOutcome {
        let Some(mut car) = car else {
            return ControlOutcome::default();
        };
        let dead_zone = self.tuning.dead_zone;
        let assist = if car.at_boundary {
            self.boundary_turn_assist
        } else {
            1.0
        };
        let (forward, turn) = self.axes();

        if forward > dead_zone {
            car.accelerate(forward);
        } else if forward < -dead_zone {
            car.brake(-forward);
        }

        let turning = turn.abs() > dead_zone;
        if turning {
            car.steer(-turn.signum(), turn.abs() * assist);
        }

        let drift_input = car.speed() > self.drift_speed && turn.abs() > self.horizontal_swipe_threshold;
        car.update_drift(drift_input);
        car.update_tilt(-turn);

        ControlOutcome {
            moving: forward.abs() > dead_zone,
            turning,
        }
    }

    fn surface(&self) -> InputSurface {
        let (forward, turn) = self.axes();
        InputSurface {
            throttle: forward,
            steer: -turn,
            active_pointer: self.active_touch,
        }
    }

    fn overlay(&self) -> Option<ControlOverlay> {
        Some(ControlOverlay {
            center: self.geometry.center,
            radius: self.geometry.outer_radius,
            thumb: self.geometry.center + self.displacement,
            thumb_radius: self.tuning.thumb_size / 2.0,
            active: self.active_touch.is_some(),
        })
    }
}
