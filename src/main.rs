mod app;
mod camera;
mod components;
mod config;
mod controls;
mod engine;
mod error;
mod fsm;
mod math;
mod renderer;
mod scene;
mod systems;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use app::{GameApp, BASE_TITLE};
use clap::Parser;
use config::Tuning;
use controls::{build_mapper, ControlScheme, DialSteering};
use engine::window::GameWindow;
use error::AppError;

#[derive(Parser)]
#[command(name = "drivefolio", about = "Drive a car around a portfolio")]
struct Args {
    /// JSON file overriding any of the built-in tuning values
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Input scheme; touch schemes also apply the mobile force multipliers
    #[arg(long, value_enum, default_value_t = ControlScheme::Desktop)]
    controls: ControlScheme,

    /// How the dial steers (dial scheme only)
    #[arg(long, value_enum, default_value_t = DialSteering::Torque)]
    dial_steering: DialSteering,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn run(args: Args) -> Result<(), AppError> {
    let mut tuning = Tuning::load(args.tuning.as_deref())?;
    if args.controls.is_touch() {
        tuning.apply_touch_multipliers();
    }
    tracing::info!(controls = ?args.controls, tuning = ?args.tuning, "starting");

    let sdl = sdl2::init().map_err(|e| AppError::sdl("init", e))?;
    let mut window = GameWindow::new(&sdl, BASE_TITLE, args.width, args.height)?;

    let mapper = build_mapper(args.controls, args.dial_steering, &tuning, window.size());
    let mut app = GameApp::new(tuning, mapper);
    app.run(&sdl, &mut window)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}
