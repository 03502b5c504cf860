use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;

/// Pointer id used when the left mouse button stands in for a finger.
pub const MOUSE_POINTER_ID: i64 = -1;

/// SDL tags mouse events it synthesizes from touches with this device id.
const TOUCH_MOUSE_ID: u32 = u32::MAX;

/// A touch contact in drawable pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: i64,
    pub x: f32,
    pub y: f32,
}

/// Platform-neutral input edges consumed by the control mappers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Scancode),
    KeyReleased(Scancode),
    TouchStart(TouchPoint),
    TouchMove(TouchPoint),
    TouchEnd(TouchPoint),
    TouchCancel(TouchPoint),
    Resized { width: u32, height: u32 },
}

pub struct InputState {
    /// Edges collected during the last `update`.
    pub events: Vec<InputEvent>,
    pub quit: bool,
    /// Drawable size in pixels.
    viewport: (u32, u32),
    /// Drawable pixels per window point, per axis. Above 1 on HiDPI displays.
    mouse_scale: (f32, f32),
    mouse_down: bool,
    resize_pending: bool,
}

impl InputState {
    /// `pixels` is the drawable size, `points` the window size that mouse
    /// coordinates arrive in.
    pub fn new(pixels: (u32, u32), points: (u32, u32)) -> Self {
        Self {
            events: Vec::new(),
            quit: false,
            viewport: pixels,
            mouse_scale: scale_between(pixels, points),
            mouse_down: false,
            resize_pending: false,
        }
    }

    /// The window changed size during the last `update`; the caller should
    /// query the new sizes and pass them to `set_viewport`.
    pub fn resize_pending(&self) -> bool {
        self.resize_pending
    }

    /// Apply new window geometry and queue a `Resized` edge in pixels.
    pub fn set_viewport(&mut self, pixels: (u32, u32), points: (u32, u32)) {
        let pixels = (pixels.0.max(1), pixels.1.max(1));
        self.viewport = pixels;
        self.mouse_scale = scale_between(pixels, points);
        self.resize_pending = false;
        tracing::debug!(?pixels, ?points, "viewport changed");
        self.events.push(InputEvent::Resized {
            width: pixels.0,
            height: pixels.1,
        });
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.events.clear();
        for event in event_pump.poll_iter() {
            if let Some(input) = self.translate(event) {
                self.events.push(input);
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn translate(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Quit { .. } => {
                self.quit = true;
                None
            }
            Event::KeyDown {
                scancode: Some(sc),
                repeat: false,
                ..
            } => Some(InputEvent::KeyPressed(sc)),
            Event::KeyUp {
                scancode: Some(sc), ..
            } => Some(InputEvent::KeyReleased(sc)),

            Event::FingerDown {
                finger_id, x, y, ..
            } => Some(InputEvent::TouchStart(self.finger(finger_id, x, y))),
            Event::FingerMotion {
                finger_id, x, y, ..
            } => Some(InputEvent::TouchMove(self.finger(finger_id, x, y))),
            Event::FingerUp {
                finger_id, x, y, ..
            } => Some(InputEvent::TouchEnd(self.finger(finger_id, x, y))),

            Event::MouseButtonDown {
                which,
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } if !is_synthetic_mouse(which) => {
                self.mouse_down = true;
                Some(InputEvent::TouchStart(self.mouse(x, y)))
            }
            Event::MouseMotion { which, x, y, .. } if self.mouse_down && !is_synthetic_mouse(which) => {
                Some(InputEvent::TouchMove(self.mouse(x, y)))
            }
            Event::MouseButtonUp {
                which,
                mouse_btn: MouseButton::Left,
                x,
                y,
                ..
            } if !is_synthetic_mouse(which) => {
                self.mouse_down = false;
                Some(InputEvent::TouchEnd(self.mouse(x, y)))
            }

            Event::Window {
                win_event: WindowEvent::FocusLost,
                ..
            } if self.mouse_down => {
                self.mouse_down = false;
                Some(InputEvent::TouchCancel(self.mouse(0, 0)))
            }
            // Reported in points; the drawable size is read back from the
            // canvas by the caller.
            Event::Window {
                win_event: WindowEvent::SizeChanged(..),
                ..
            } => {
                self.resize_pending = true;
                None
            }
            _ => None,
        }
    }

    /// SDL reports finger positions normalised to the window; scale to pixels.
    fn finger(&self, id: i64, x: f32, y: f32) -> TouchPoint {
        TouchPoint {
            id,
            x: x * self.viewport.0 as f32,
            y: y * self.viewport.1 as f32,
        }
    }

    /// Mouse positions arrive in window points.
    fn mouse(&self, x: i32, y: i32) -> TouchPoint {
        TouchPoint {
            id: MOUSE_POINTER_ID,
            x: x as f32 * self.mouse_scale.0,
            y: y as f32 * self.mouse_scale.1,
        }
    }
}

fn is_synthetic_mouse(which: u32) -> bool {
    which == TOUCH_MOUSE_ID
}

fn scale_between(pixels: (u32, u32), points: (u32, u32)) -> (f32, f32) {
    let axis = |px: u32, pt: u32| if pt == 0 { 1.0 } else { px as f32 / pt as f32 };
    (axis(pixels.0, points.0), axis(pixels.1, points.1))
}
