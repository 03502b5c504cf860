use hecs::{Entity, World};
use sdl2::keyboard::Scancode;
use sdl2::Sdl;

use crate::camera::Camera;
use crate::components::{Pose, Telemetry};
use crate::config::{SectionKind, Tuning};
use crate::controls::{control_system, ControlMapper, ControlOutcome};
use crate::engine::input::{InputEvent, InputState};
use crate::engine::time::FrameTimer;
use crate::engine::window::GameWindow;
use crate::error::AppError;
use crate::renderer::{Highlight, Renderer};
use crate::scene::portfolio::load_portfolio_scene;
use crate::systems::{model_loading_system, vehicle_physics_system, SectionEvent, SectionTracker};
use crate::ui::{DebugHud, HudFrame, Interaction};

pub const BASE_TITLE: &str = "drivefolio";

/// What the frame loop should do after input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopAction {
    Continue,
    Quit,
}

pub struct GameApp {
    tuning: Tuning,
    world: World,
    car: Entity,
    camera: Camera,
    renderer: Renderer,
    mapper: Box<dyn ControlMapper>,
    tracker: SectionTracker,
    interaction: Interaction,
    debug_hud: DebugHud,
    outcome: ControlOutcome,
    title: String,
}

impl GameApp {
    pub fn new(tuning: Tuning, mapper: Box<dyn ControlMapper>) -> Self {
        let mut world = World::new();
        let car = load_portfolio_scene(&mut world, &tuning);

        Self {
            camera: Camera::new(
                tuning.car.start_position(),
                tuning.ui.pixels_per_unit,
                tuning.ui.camera_follow_lerp,
            ),
            renderer: Renderer::new(&tuning),
            interaction: Interaction::new(tuning.ui.panel_cooldown_ms),
            tracker: SectionTracker::new(),
            debug_hud: DebugHud::new(),
            outcome: ControlOutcome::default(),
            title: String::new(),
            tuning,
            world,
            car,
            mapper,
        }
    }

    pub fn run(&mut self, sdl: &Sdl, window: &mut GameWindow) -> Result<(), AppError> {
        let mut event_pump = sdl.event_pump().map_err(|e| AppError::sdl("event pump", e))?;
        let (width, height) = window.size();
        let mut input = InputState::new((width, height), window.window_size());
        let mut timer = FrameTimer::new();

        // The drawable size can differ from the requested window size.
        self.mapper.handle_event(&InputEvent::Resized { width, height });

        loop {
            timer.tick();
            input.update(&mut event_pump);
            if input.resize_pending() {
                input.set_viewport(window.size(), window.window_size());
            }

            if input.should_quit() || self.handle_input(&input.events) == LoopAction::Quit {
                break;
            }

            self.update(timer.dt);
            self.render(window)?;
            window.present();
        }

        tracing::info!(frames = timer.frame, "shutting down");
        Ok(())
    }

    fn handle_input(&mut self, events: &[InputEvent]) -> LoopAction {
        for event in events {
            match event {
                InputEvent::KeyPressed(Scancode::F3) => self.debug_hud.toggle(),
                InputEvent::KeyPressed(Scancode::Return | Scancode::KpEnter | Scancode::E) => {
                    self.interaction.trigger(self.tracker.in_range());
                }
                InputEvent::KeyPressed(Scancode::Escape) => {
                    if self.interaction.close().is_none() {
                        return LoopAction::Quit;
                    }
                }
                InputEvent::KeyPressed(Scancode::F) => {
                    self.interaction.toggle(self.tracker.in_range());
                }
                // A tap closes an open panel, or opens one unless the dial
                // claims it.
                InputEvent::TouchStart(_) => {
                    if self.interaction.is_car_locked() || !self.mapper.handle_event(event) {
                        self.interaction.toggle(self.tracker.in_range());
                    }
                }
                _ => {
                    self.mapper.handle_event(event);
                }
            }
        }
        LoopAction::Continue
    }

    fn update(&mut self, dt: f32) {
        for entity in model_loading_system(&mut self.world, dt * 1000.0, &self.tuning.car) {
            if let Ok(pose) = self.world.get::<&Pose>(entity) {
                self.camera.snap_to(pose.position);
            }
        }

        self.interaction.tick(dt);
        let locked = self.interaction.is_car_locked();

        self.outcome = control_system(
            &mut self.world,
            self.mapper.as_mut(),
            &self.tuning.physics,
            &self.tuning.world,
            locked,
        );
        vehicle_physics_system(&mut self.world, &self.tuning.physics, &self.tuning.world);

        if let Some(telemetry) = self.telemetry() {
            if !locked {
                if let Some(SectionEvent::Entered(kind)) =
                    self.tracker.update(&self.world, telemetry.position)
                {
                    tracing::info!(section = ?kind, "section in range");
                }
            }
            self.camera.follow(telemetry.position);
        }

        if self.debug_hud.is_visible() {
            self.debug_hud.update(dt);
        }
    }

    /// Latest snapshot, once the car is on the ground.
    fn telemetry(&self) -> Option<Telemetry> {
        if self.world.get::<&Pose>(self.car).is_err() {
            return None;
        }
        self.world.get::<&Telemetry>(self.car).ok().map(|t| *t)
    }

    /// Configured title of a section, falling back to its kind.
    fn section_title(&self, kind: SectionKind) -> &str {
        self.tuning
            .sections
            .iter()
            .find(|section| section.kind == kind)
            .map_or(kind.label(), |section| section.title.as_str())
    }

    fn render(&mut self, window: &mut GameWindow) -> Result<(), AppError> {
        let highlight = Highlight {
            in_range: self.tracker.in_range(),
            open: self.interaction.open_section(),
        };
        let frame = HudFrame {
            telemetry: self.telemetry(),
            in_range: highlight.in_range.map(|kind| self.section_title(kind)),
            open: highlight.open.map(|kind| self.section_title(kind)),
            surface: self.mapper.surface(),
            outcome: self.outcome,
        };
        let title = self.debug_hud.title(BASE_TITLE, &frame);
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }

        let overlay = self.mapper.overlay();
        self.renderer
            .draw_frame(window.canvas(), &self.camera, &self.world, highlight, overlay)
    }
}
