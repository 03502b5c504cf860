use crate::components::Telemetry;
use crate::controls::{ControlOutcome, InputSurface};

const FPS_SAMPLES: usize = 60;

/// Everything the title readout shows for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudFrame<'a> {
    /// `None` while the car is still loading.
    pub telemetry: Option<Telemetry>,
    /// Title of the section under the car.
    pub in_range: Option<&'a str>,
    /// Title of the open panel.
    pub open: Option<&'a str>,
    pub surface: InputSurface,
    pub outcome: ControlOutcome,
}

/// Debug readout shown in the window title. F3 toggles it.
pub struct DebugHud {
    visible: bool,
    fps_ring: [f32; FPS_SAMPLES],
    fps_index: usize,
    fps_count: usize,
}

impl DebugHud {
    pub fn new() -> Self {
        Self {
            visible: false,
            fps_ring: [0.0; FPS_SAMPLES],
            fps_index: 0,
            fps_count: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Push a frame delta into the rolling FPS buffer.
    pub fn update(&mut self, dt: f32) {
        self.fps_ring[self.fps_index] = dt;
        self.fps_index = (self.fps_index + 1) % FPS_SAMPLES;
        if self.fps_count < FPS_SAMPLES {
            self.fps_count += 1;
        }
    }

    pub fn fps(&self) -> f32 {
        let sum: f32 = self.fps_ring[..self.fps_count].iter().sum();
        if self.fps_count == 0 || sum <= 0.0 {
            0.0
        } else {
            self.fps_count as f32 / sum
        }
    }

    /// Window title: the base title, the section in range or open, and the
    /// debug readout when visible.
    pub fn title(&self, base: &str, frame: &HudFrame<'_>) -> String {
        let mut title = base.to_string();

        match (frame.open, frame.in_range) {
            (Some(section), _) => title.push_str(&format!(" | {section} (Esc to close)")),
            (None, Some(section)) => title.push_str(&format!(" | {section} (Enter to open)")),
            (None, None) => {}
        }

        if !self.visible {
            return title;
        }

        title.push_str(&format!(" | FPS {:.0}", self.fps()));
        let Some(t) = frame.telemetry else {
            title.push_str(" | loading");
            return title;
        };

        title.push_str(&format!(
            " | pos {:.1} {:.1} | yaw {:.0}° tilt {:.2} | speed {:.3} | steer {:+.2}",
            t.position.x,
            t.position.z,
            t.yaw.to_degrees(),
            t.tilt,
            t.speed,
            t.steering,
        ));
        title.push_str(&format!(
            " | in {:+.2}/{:+.2}",
            frame.surface.throttle, frame.surface.steer
        ));
        if frame.surface.active_pointer.is_some() {
            title.push_str(" touch");
        }

        let flags = [
            (t.flags.accelerating, "GAS"),
            (t.flags.braking, "BRAKE"),
            (t.flags.reversing, "REV"),
            (t.flags.turning || frame.outcome.turning, "TURN"),
            (t.drifting, "DRIFT"),
            (t.at_boundary, "EDGE"),
            (!t.moved, "HIT"),
        ];
        for (_, label) in flags.iter().filter(|(on, _)| *on) {
            title.push(' ');
            title.push_str(label);
        }
        if !frame.outcome.moving && t.speed > 0.0 {
            title.push_str(" coast");
        }
        title
    }
}
