pub mod portfolio;
pub mod prefabs;
