use std::time::Instant;

/// Longest frame the timers will account for; a stalled window (dragging,
/// breakpoint) should not fast-forward the panel cooldown or loading delay.
const MAX_FRAME_SECS: f32 = 0.25;

pub struct FrameTimer {
    last: Instant,
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub frame: u64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
            frame: 0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.advance(now.duration_since(self.last).as_secs_f32());
        self.last = now;
    }

    fn advance(&mut self, raw_dt: f32) {
        self.dt = raw_dt.min(MAX_FRAME_SECS);
        self.frame += 1;
    }
}
