use glam::Vec2;
use hecs::World;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::camera::Camera;
use crate::components::{Car, Pose, SectionPlate, Telemetry};
use crate::config::{SectionKind, Tuning};
use crate::controls::ControlOverlay;
use crate::error::AppError;
use crate::math::directions_from_yaw;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const GRID_SPACING: f32 = 10.0;
/// Frames of travel drawn for the velocity arrow.
const VELOCITY_ARROW_FRAMES: f32 = 10.0;
const CIRCLE_SEGMENTS: usize = 48;
const HIGHLIGHT_WIDTH: i32 = 3;
const OVERLAY_COLOR: Color = Color::RGBA(255, 255, 255, 160);
const VELOCITY_COLOR: Color = Color::RGB(40, 40, 200);

fn rgb(hex: u32) -> Color {
    Color::RGB((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

fn point(p: Vec2) -> Point {
    Point::new(p.x.round() as i32, p.y.round() as i32)
}

fn sdl(result: Result<(), String>) -> Result<(), AppError> {
    result.map_err(|e| AppError::sdl("draw", e))
}

/// Which plate to emphasise this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlight {
    pub in_range: Option<SectionKind>,
    pub open: Option<SectionKind>,
}

/// Top-down view of the ground plane on the SDL canvas.
pub struct Renderer {
    tuning: Tuning,
    viewport: (u32, u32),
}

impl Renderer {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.clone(),
            viewport: (1, 1),
        }
    }

    pub fn draw_frame(
        &mut self,
        canvas: &mut Canvas<Window>,
        camera: &Camera,
        world: &World,
        highlight: Highlight,
        overlay: Option<ControlOverlay>,
    ) -> Result<(), AppError> {
        self.viewport = canvas.output_size().map_err(|e| AppError::sdl("output size", e))?;

        canvas.set_draw_color(rgb(self.tuning.ui.background_color));
        canvas.clear();

        self.draw_ground(canvas, camera)?;
        self.draw_plates(canvas, camera, world, highlight)?;
        self.draw_car(canvas, camera, world)?;
        if let Some(overlay) = overlay {
            self.draw_overlay(canvas, &overlay)?;
        }
        Ok(())
    }

    fn to_screen(&self, camera: &Camera, x: f32, z: f32) -> Vec2 {
        camera.world_to_screen(Vec2::new(x, z), self.viewport)
    }

    fn rect(&self, camera: &Camera, min: Vec2, max: Vec2) -> Option<Rect> {
        let a = self.to_screen(camera, min.x, min.y);
        let b = self.to_screen(camera, max.x, max.y);
        let size = (b - a).abs();
        if size.x < 1.0 || size.y < 1.0 {
            return None;
        }
        Some(Rect::new(
            a.x.min(b.x).round() as i32,
            a.y.min(b.y).round() as i32,
            size.x.round() as u32,
            size.y.round() as u32,
        ))
    }

    fn draw_ground(&self, canvas: &mut Canvas<Window>, camera: &Camera) -> Result<(), AppError> {
        let ui = &self.tuning.ui;
        let bounds = &self.tuning.world;
        let min = Vec2::new(bounds.min_x, bounds.min_z);
        let max = Vec2::new(bounds.max_x, bounds.max_z);

        let Some(area) = self.rect(camera, min, max) else {
            return Ok(());
        };
        canvas.set_draw_color(rgb(ui.ground_color));
        sdl(canvas.fill_rect(area))?;

        canvas.set_draw_color(rgb(ui.grid_color));
        let mut x = (bounds.min_x / GRID_SPACING).ceil() * GRID_SPACING;
        while x <= bounds.max_x {
            let a = self.to_screen(camera, x, bounds.min_z);
            let b = self.to_screen(camera, x, bounds.max_z);
            sdl(canvas.draw_line(point(a), point(b)))?;
            x += GRID_SPACING;
        }
        let mut z = (bounds.min_z / GRID_SPACING).ceil() * GRID_SPACING;
        while z <= bounds.max_z {
            let a = self.to_screen(camera, bounds.min_x, z);
            let b = self.to_screen(camera, bounds.max_x, z);
            sdl(canvas.draw_line(point(a), point(b)))?;
            z += GRID_SPACING;
        }

        canvas.set_draw_color(rgb(ui.boundary_color));
        for inset in 0..HIGHLIGHT_WIDTH {
            sdl(canvas.draw_rect(shrink(area, inset)))?;
        }
        Ok(())
    }

    fn draw_plates(
        &self,
        canvas: &mut Canvas<Window>,
        camera: &Camera,
        world: &World,
        highlight: Highlight,
    ) -> Result<(), AppError> {
        let mut query = world.query::<&SectionPlate>();
        let mut plates: Vec<&SectionPlate> = query.iter().map(|(_, plate)| plate).collect();
        plates.sort_by_key(|plate| std::cmp::Reverse(plate.order));

        for plate in plates {
            let Some(area) =
                self.rect(camera, plate.center - plate.half_size, plate.center + plate.half_size)
            else {
                continue;
            };
            canvas.set_draw_color(rgb(plate.color));
            sdl(canvas.fill_rect(area))?;

            let emphasised = highlight.open == Some(plate.kind)
                || (highlight.open.is_none() && highlight.in_range == Some(plate.kind));
            if emphasised {
                canvas.set_draw_color(rgb(self.tuning.ui.drift_color));
                for inset in 0..HIGHLIGHT_WIDTH {
                    sdl(canvas.draw_rect(shrink(area, inset)))?;
                }
            }
        }
        Ok(())
    }

    fn draw_car(&self, canvas: &mut Canvas<Window>, camera: &Camera, world: &World) -> Result<(), AppError> {
        let mut query = world.query::<(&Pose, &Telemetry)>().with::<&Car>();
        for (_, (pose, telemetry)) in query.iter() {
            let (forward, right) = directions_from_yaw(pose.yaw);
            // Thrust points along -forward; that end is the nose.
            let nose = -Vec2::new(forward.x, forward.z);
            let side = Vec2::new(right.x, right.z);
            let center = Vec2::new(pose.position.x, pose.position.z);
            let [width, length] = self.tuning.car.footprint;
            let half_len = nose * (length / 2.0);
            let half_wid = side * (width / 2.0);

            let corners = [
                center + half_len + half_wid,
                center + half_len - half_wid,
                center - half_len - half_wid,
                center - half_len + half_wid,
            ]
            .map(|c| camera.world_to_screen(c, self.viewport));

            canvas.set_draw_color(rgb(self.tuning.car.color));
            fill_quad(canvas, corners)?;

            let outline = if telemetry.drifting {
                rgb(self.tuning.ui.drift_color)
            } else {
                rgb(self.tuning.ui.boundary_color)
            };
            canvas.set_draw_color(outline);
            let mut ring: Vec<Point> = corners.iter().copied().map(point).collect();
            ring.push(ring[0]);
            sdl(canvas.draw_lines(ring.as_slice()))?;

            let from = camera.world_to_screen(center, self.viewport);
            let tip = camera.world_to_screen(
                center + Vec2::new(telemetry.velocity.x, telemetry.velocity.z) * VELOCITY_ARROW_FRAMES,
                self.viewport,
            );
            canvas.set_draw_color(VELOCITY_COLOR);
            sdl(canvas.draw_line(point(from), point(tip)))?;
        }
        Ok(())
    }

    fn draw_overlay(&self, canvas: &mut Canvas<Window>, overlay: &ControlOverlay) -> Result<(), AppError> {
        canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
        canvas.set_draw_color(OVERLAY_COLOR);
        draw_circle(canvas, overlay.center, overlay.radius)?;
        draw_circle(canvas, overlay.thumb, overlay.thumb_radius)?;
        if overlay.active {
            draw_circle(canvas, overlay.thumb, overlay.thumb_radius * 0.5)?;
        }
        canvas.set_blend_mode(sdl2::render::BlendMode::None);
        Ok(())
    }
}

fn shrink(rect: Rect, by: i32) -> Rect {
    let w = (rect.width() as i32 - 2 * by).max(1) as u32;
    let h = (rect.height() as i32 - 2 * by).max(1) as u32;
    Rect::new(rect.x() + by, rect.y() + by, w, h)
}

/// Fill a convex quad by sweeping lines between two opposite edges.
fn fill_quad(canvas: &mut Canvas<Window>, c: [Vec2; 4]) -> Result<(), AppError> {
    let steps = c[0].distance(c[3]).max(c[1].distance(c[2])).ceil().max(1.0) as usize * 2;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let a = c[0].lerp(c[3], t);
        let b = c[1].lerp(c[2], t);
        sdl(canvas.draw_line(point(a), point(b)))?;
    }
    Ok(())
}

fn draw_circle(canvas: &mut Canvas<Window>, center: Vec2, radius: f32) -> Result<(), AppError> {
    let points: Vec<Point> = (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            point(center + Vec2::new(a.cos(), a.sin()) * radius)
        })
        .collect();
    sdl(canvas.draw_lines(points.as_slice()))
}
