use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::Sdl;

use crate::error::AppError;

/// Resizable window with a vsynced 2D canvas.
pub struct GameWindow {
    canvas: Canvas<Window>,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self, AppError> {
        let video = sdl.video().map_err(|e| AppError::sdl("video", e))?;

        let window = video
            .window(title, width, height)
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()
            .map_err(|e| AppError::sdl("window", e))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| AppError::sdl("canvas", e))?;

        tracing::info!(width, height, "window created");
        Ok(Self { canvas })
    }

    pub fn canvas(&mut self) -> &mut Canvas<Window> {
        &mut self.canvas
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }

    /// Drawable size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.canvas.output_size().unwrap_or_else(|_| self.window_size())
    }

    /// Window size in points, the space mouse events use.
    pub fn window_size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }

    pub fn set_title(&mut self, title: &str) {
        if let Err(e) = self.canvas.window_mut().set_title(title) {
            tracing::warn!(error = %e, "could not set window title");
        }
    }
}
