use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::{CarHandle, ControlMapper, ControlOutcome, ControlOverlay, DialSteering, InputSurface};
use crate::config::{DialTuning, MobileTuning};
use crate::engine::input::{InputEvent, TouchPoint};
use crate::math::{lerp_angle, normalize_angle};

/// Thumb rest angle: straight below the dial centre in screen space.
const REST_ANGLE: f32 = FRAC_PI_2;
/// Dial input magnitude above which the car counts as turning.
const TURNING_INPUT: f32 = 0.1;

/// Screen placement of a round touch control, recomputed on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub center: Vec2,
    pub outer_radius: f32,
    /// Distance from the centre at which the thumb rides.
    pub track_radius: f32,
}

impl DialGeometry {
    /// Largest circle that fits the viewport inside the safety padding,
    /// centred horizontally and resting on the bottom padding.
    pub fn from_viewport(width: u32, height: u32, tuning: &DialTuning) -> Self {
        let diameter = (width.min(height) as f32 - 2.0 * tuning.safety_padding).max(tuning.thumb_size);
        let outer_radius = diameter / 2.0;
        let track_radius =
            (outer_radius - tuning.thumb_size / 2.0 - tuning.thumb_padding).max(0.0);
        let center = Vec2::new(
            width as f32 / 2.0,
            height as f32 - tuning.safety_padding - outer_radius,
        );
        Self {
            center,
            outer_radius,
            track_radius,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.outer_radius
    }

    /// Screen angle of `point` around the centre (y grows downwards).
    pub fn angle_of(&self, point: Vec2) -> f32 {
        let d = point - self.center;
        d.y.atan2(d.x)
    }

    pub fn point_on_track(&self, angle: f32) -> Vec2 {
        self.center + Vec2::new(angle.cos(), angle.sin()) * self.track_radius
    }
}

/// Rotating steering wheel on the touch screen. Holding it keeps the throttle
/// open; winding it steers.
pub struct TouchSteeringMapper {
    tuning: DialTuning,
    mode: DialSteering,
    boundary_turn_assist: f32,
    drift_speed: f32,
    geometry: DialGeometry,

    /// Thumb angle as drawn.
    current_angle: f32,
    target_angle: f32,
    /// Net winding since touch-down, clamped to ±max_rotation.
    cumulative_angle: f32,
    previous_raw_angle: f32,
    angular_velocity: f32,
    active_touch: Option<i64>,
    /// Heading at touch-down, captured on the first update of a gesture.
    anchor_yaw: Option<f32>,
}

impl TouchSteeringMapper {
    pub fn new(mobile: &MobileTuning, mode: DialSteering, viewport: (u32, u32)) -> Self {
        let tuning = mobile.dial.clone();
        let geometry = DialGeometry::from_viewport(viewport.0, viewport.1, &tuning);
        Self {
            tuning,
            mode,
            boundary_turn_assist: mobile.boundary_turn_assist,
            drift_speed: mobile.drift_speed,
            geometry,
            current_angle: REST_ANGLE,
            target_angle: REST_ANGLE,
            cumulative_angle: 0.0,
            previous_raw_angle: REST_ANGLE,
            angular_velocity: 0.0,
            active_touch: None,
            anchor_yaw: None,
        }
    }

    pub fn geometry(&self) -> DialGeometry {
        self.geometry
    }

    pub fn cumulative_angle(&self) -> f32 {
        self.cumulative_angle
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn is_active(&self) -> bool {
        self.active_touch.is_some()
    }

    /// Winding mapped to [-1, 1], a quarter turn for full lock, zero inside
    /// the dead zone.
    pub fn steering_input(&self) -> f32 {
        let input = (self.cumulative_angle / FRAC_PI_2).clamp(-1.0, 1.0);
        if input.abs() < self.tuning.dead_zone {
            0.0
        } else {
            input
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.geometry = DialGeometry::from_viewport(width, height, &self.tuning);
        tracing::debug!(width, height, radius = self.geometry.outer_radius, "dial resized");
    }

    fn touch_start(&mut self, touch: &TouchPoint) -> bool {
        let point = Vec2::new(touch.x, touch.y);
        if !self.geometry.contains(point) {
            return false;
        }
        if let Some(active) = self.active_touch {
            if active != touch.id {
                tracing::warn!(active, ignored = touch.id, "dial already held; ignoring touch");
            }
            return true;
        }

        let angle = self.geometry.angle_of(point);
        self.active_touch = Some(touch.id);
        self.current_angle = angle;
        self.target_angle = angle;
        self.previous_raw_angle = angle;
        self.cumulative_angle = 0.0;
        self.angular_velocity = 0.0;
        self.anchor_yaw = None;
        true
    }

    fn touch_move(&mut self, touch: &TouchPoint) -> bool {
        if self.active_touch != Some(touch.id) {
            return false;
        }
        let raw = self.geometry.angle_of(Vec2::new(touch.x, touch.y));
        let delta = normalize_angle(raw - self.previous_raw_angle);
        let limit = self.tuning.max_rotation;

        self.cumulative_angle = (self.cumulative_angle + delta).clamp(-limit, limit);
        self.previous_raw_angle = raw;
        self.angular_velocity = delta;
        self.current_angle = raw;
        self.target_angle = raw;
        true
    }

    fn touch_end(&mut self, touch: &TouchPoint) -> bool {
        if self.active_touch != Some(touch.id) {
            return false;
        }
        self.active_touch = None;
        self.anchor_yaw = None;
        self.cumulative_angle = 0.0;
        self.angular_velocity = 0.0;
        if self.tuning.return_to_center {
            self.target_angle = REST_ANGLE;
            self.previous_raw_angle = REST_ANGLE;
        }
        true
    }
}

impl ControlMapper for TouchSteeringMapper {
    fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::TouchStart(touch) => self.touch_start(touch),
            InputEvent::TouchMove(touch) => self.touch_move(touch),
            InputEvent::TouchEnd(touch) | InputEvent::TouchCancel(touch) => self.touch_end(touch),
            InputEvent::Resized { width, height } => {
                self.resize(*width, *height);
                false
            }
            _ => false,
        }
    }

    fn update(&mut self, car: Option<CarHandle<'_>>) -> ControlOutcome {
        let Some(mut car) = car else {
            return ControlOutcome::default();
        };
        let assist = if car.at_boundary {
            self.boundary_turn_assist
        } else {
            1.0
        };

        let active = self.is_active();
        let mut turning = false;

        if active {
            car.accelerate(1.0);

            // Clockwise winding is positive input and turns right.
            let input = self.steering_input();
            match self.mode {
                DialSteering::Torque => {
                    if input != 0.0 {
                        car.steer(-input, assist);
                    }
                }
                DialSteering::DirectRotation => {
                    let anchor = *self.anchor_yaw.get_or_insert(car.yaw());
                    car.set_target_rotation(
                        anchor - self.cumulative_angle,
                        self.tuning.steering_lerp * assist,
                    );
                }
            }

            turning = input.abs() > TURNING_INPUT;
            car.update_tilt(-input * input.abs());
        } else {
            if self.tuning.return_to_center {
                self.current_angle =
                    lerp_angle(self.current_angle, self.target_angle, self.tuning.return_lerp);
            }
            car.update_tilt(0.0);
        }

        let drift_input = car.speed() > self.drift_speed && turning;
        car.update_drift(drift_input);

        ControlOutcome {
            moving: active,
            turning,
        }
    }

    fn surface(&self) -> InputSurface {
        InputSurface {
            throttle: if self.is_active() { 1.0 } else { 0.0 },
            steer: self.steering_input(),
            active_pointer: self.active_touch,
        }
    }

    fn overlay(&self) -> Option<ControlOverlay> {
        Some(ControlOverlay {
            center: self.geometry.center,
            radius: self.geometry.outer_radius,
            thumb: self.geometry.point_on_track(self.current_angle),
            thumb_radius: self.tuning.thumb_size / 2.0,
            active: self.is_active(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Pose, VehicleBody};
    use crate::config::PhysicsTuning;
    use glam::Vec3;
    use std::f32::consts::{FRAC_PI_4, PI};

    const VIEWPORT: (u32, u32) = (400, 800);

    fn mapper(mode: DialSteering) -> TouchSteeringMapper {
        TouchSteeringMapper::new(&MobileTuning::default(), mode, VIEWPORT)
    }

    fn touch_at(mapper: &TouchSteeringMapper, id: i64, angle: f32) -> TouchPoint {
        let geometry = mapper.geometry();
        let p = geometry.center + Vec2::new(angle.cos(), angle.sin()) * geometry.track_radius;
        TouchPoint { id, x: p.x, y: p.y }
    }

    fn wind(mapper: &mut TouchSteeringMapper, from: f32, to: f32, steps: usize) {
        let start = touch_at(mapper, 1, from);
        assert!(mapper.handle_event(&InputEvent::TouchStart(start)));
        for i in 1..=steps {
            let angle = from + (to - from) * i as f32 / steps as f32;
            let point = touch_at(mapper, 1, angle);
            mapper.handle_event(&InputEvent::TouchMove(point));
        }
    }

    #[test]
    fn geometry_fits_the_short_side() {
        let g = DialGeometry::from_viewport(400, 800, &DialTuning::default());
        assert!((g.outer_radius - 190.0).abs() < 1e-4);
        assert!((g.track_radius - 157.5).abs() < 1e-4);
        assert!((g.center - Vec2::new(200.0, 600.0)).length() < 1e-4);
    }

    #[test]
    fn resize_moves_the_dial() {
        let mut dial = mapper(DialSteering::Torque);
        dial.handle_event(&InputEvent::Resized {
            width: 1000,
            height: 500,
        });
        let g = dial.geometry();
        assert!((g.outer_radius - 240.0).abs() < 1e-4);
        assert!((g.center.x - 500.0).abs() < 1e-4);
    }

    #[test]
    fn touch_outside_the_dial_is_not_consumed() {
        let mut dial = mapper(DialSteering::Torque);
        let outside = TouchPoint { id: 1, x: 200.0, y: 50.0 };
        assert!(!dial.handle_event(&InputEvent::TouchStart(outside)));
        assert!(!dial.is_active());
    }

    #[test]
    fn quarter_turn_is_full_lock() {
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, FRAC_PI_2, 4);
        assert!((dial.cumulative_angle() - FRAC_PI_2).abs() < 1e-4);
        assert!((dial.steering_input() - 1.0).abs() < 1e-4);
        assert!((dial.angular_velocity() - FRAC_PI_2 / 4.0).abs() < 1e-4);
    }

    #[test]
    fn winding_is_clamped() {
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, 8.0 * PI, 32);
        assert!((dial.cumulative_angle() - 1.5 * PI).abs() < 1e-4);

        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, -8.0 * PI, 32);
        assert!((dial.cumulative_angle() + 1.5 * PI).abs() < 1e-4);
    }

    #[test]
    fn winding_across_the_seam_is_continuous() {
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, PI - FRAC_PI_4, PI + FRAC_PI_4, 2);
        assert!((dial.cumulative_angle() - FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn second_finger_is_ignored() {
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, FRAC_PI_4, 1);
        let other = touch_at(&dial, 2, FRAC_PI_2);
        assert!(dial.handle_event(&InputEvent::TouchStart(other)));
        assert!(!dial.handle_event(&InputEvent::TouchMove(other)));
        assert_eq!(dial.surface().active_pointer, Some(1));
    }

    #[test]
    fn release_resets_the_winding() {
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, FRAC_PI_2, 2);
        let end = touch_at(&dial, 1, FRAC_PI_2);
        assert!(dial.handle_event(&InputEvent::TouchCancel(end)));
        assert!(!dial.is_active());
        assert_eq!(dial.cumulative_angle(), 0.0);
        assert_eq!(dial.angular_velocity(), 0.0);
        assert_eq!(dial.surface(), InputSurface::default());
    }

    #[test]
    fn thumb_returns_to_rest_when_enabled() {
        let mut mobile = MobileTuning::default();
        mobile.dial.return_to_center = true;
        let mut dial = TouchSteeringMapper::new(&mobile, DialSteering::Torque, VIEWPORT);
        wind(&mut dial, 0.0, FRAC_PI_4, 1);
        dial.handle_event(&InputEvent::TouchEnd(touch_at(&dial, 1, FRAC_PI_4)));

        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        for _ in 0..300 {
            dial.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));
        }
        let rest = dial.geometry().point_on_track(REST_ANGLE);
        assert!((dial.overlay().unwrap().thumb - rest).length() < 1e-2);
    }

    #[test]
    fn held_dial_throttles_and_steers() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, FRAC_PI_2, 2);

        let outcome = dial.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));
        assert_eq!(outcome, ControlOutcome { moving: true, turning: true });
        assert!((body.force.length() - tuning.engine_force).abs() < 1e-5);
        assert!((body.torque + tuning.steering_force * 0.5).abs() < 1e-4);
    }

    #[test]
    fn clockwise_winding_turns_and_leans_right() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        // Rolling nose-first at yaw 0.
        body.velocity = Vec3::new(0.0, 0.0, 1.5);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        let mut dial = mapper(DialSteering::Torque);
        // Top of the dial to its right edge: clockwise on screen.
        wind(&mut dial, -FRAC_PI_2, 0.0, 2);
        assert!(dial.steering_input() > 0.0);

        dial.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));
        assert!(body.torque < 0.0);
        assert!(body.steering_angle < 0.0);
        assert!(pose.tilt < 0.0);
    }

    #[test]
    fn boundary_assist_boosts_steering() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, FRAC_PI_2, 2);

        dial.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, true)));
        assert!((body.torque + tuning.steering_force * 1.8 * 0.5).abs() < 1e-4);
    }

    #[test]
    fn boundary_assist_speeds_up_direct_rotation() {
        let tuning = PhysicsTuning::default();
        let mut dial = mapper(DialSteering::DirectRotation);
        wind(&mut dial, 0.0, FRAC_PI_4, 1);

        let mut free = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        dial.update(Some(CarHandle::new(&mut free, &mut pose, &tuning, false)));

        let mut assisted = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        dial.update(Some(CarHandle::new(&mut assisted, &mut pose, &tuning, true)));

        assert!(free.torque < 0.0);
        assert!((assisted.torque - free.torque * 1.8).abs() < 1e-4);
    }

    #[test]
    fn small_winding_falls_in_the_dead_zone() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.0);
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, 0.1, 1);

        assert_eq!(dial.steering_input(), 0.0);
        let outcome = dial.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));
        assert!(outcome.moving);
        assert!(!outcome.turning);
        assert_eq!(body.torque, 0.0);
    }

    #[test]
    fn direct_mode_chases_anchor_minus_winding() {
        let tuning = PhysicsTuning::default();
        let mut body = VehicleBody::new(&tuning);
        let mut pose = Pose::new(Vec3::ZERO, 0.3);
        let mut dial = mapper(DialSteering::DirectRotation);
        wind(&mut dial, 0.0, FRAC_PI_2, 2);

        dial.update(Some(CarHandle::new(&mut body, &mut pose, &tuning, false)));
        let expected = -FRAC_PI_2 * tuning.steering_force * 0.8 * 0.15;
        assert!((body.torque - expected).abs() < 1e-4);
    }

    #[test]
    fn no_car_no_effect() {
        let mut dial = mapper(DialSteering::Torque);
        wind(&mut dial, 0.0, FRAC_PI_2, 2);
        assert_eq!(dial.update(None), ControlOutcome::default());
        assert!(dial.is_active());
    }
}
