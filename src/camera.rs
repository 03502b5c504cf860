use glam::{Vec2, Vec3};

/// Top-down camera looking at the ground plane. World +X is screen right and
/// world +Z is screen down.
pub struct Camera {
    /// Ground-plane point at the centre of the screen (world x, z).
    pub focus: Vec2,
    pub pixels_per_unit: f32,
    pub follow_lerp: f32,
}

impl Camera {
    pub fn new(focus: Vec3, pixels_per_unit: f32, follow_lerp: f32) -> Self {
        Self {
            focus: Vec2::new(focus.x, focus.z),
            pixels_per_unit,
            follow_lerp,
        }
    }

    /// Ease toward `target` by the follow factor. Called once per frame.
    pub fn follow(&mut self, target: Vec3) {
        let target = Vec2::new(target.x, target.z);
        self.focus = self.focus.lerp(target, self.follow_lerp);
    }

    pub fn snap_to(&mut self, target: Vec3) {
        self.focus = Vec2::new(target.x, target.z);
    }

    pub fn world_to_screen(&self, world: Vec2, viewport: (u32, u32)) -> Vec2 {
        let half = Vec2::new(viewport.0 as f32, viewport.1 as f32) * 0.5;
        half + (world - self.focus) * self.pixels_per_unit
    }
}
