pub mod hud;
pub mod interaction;

pub use hud::{DebugHud, HudFrame};
pub use interaction::Interaction;
