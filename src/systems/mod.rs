mod drift;
mod forces;
mod loading;
mod physics;
mod sections;

pub use loading::model_loading_system;
pub use physics::vehicle_physics_system;
pub use sections::{SectionEvent, SectionTracker};
