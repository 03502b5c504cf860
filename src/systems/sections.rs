use glam::Vec3;
use hecs::World;

use crate::components::SectionPlate;
use crate::config::SectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionEvent {
    Entered(SectionKind),
    Left,
}

/// Remembers which plate the car is standing on and reports changes.
#[derive(Debug, Default)]
pub struct SectionTracker {
    in_range: Option<SectionKind>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_range(&self) -> Option<SectionKind> {
        self.in_range
    }

    /// First plate (lowest `order`) strictly containing `position`.
    pub fn plate_at(world: &World, position: Vec3) -> Option<SectionKind> {
        let mut plates = world.query::<&SectionPlate>();
        let found = plates
            .iter()
            .filter(|(_, plate)| plate.contains(position))
            .min_by_key(|(_, plate)| plate.order)
            .map(|(_, plate)| plate.kind);
        found
    }

    pub fn update(&mut self, world: &World, position: Vec3) -> Option<SectionEvent> {
        match Self::plate_at(world, position) {
            Some(kind) if self.in_range != Some(kind) => {
                self.in_range = Some(kind);
                tracing::debug!(section = ?kind, "entered section");
                Some(SectionEvent::Entered(kind))
            }
            Some(_) => None,
            None if self.in_range.is_some() => {
                self.in_range = None;
                tracing::debug!("left section");
                Some(SectionEvent::Left)
            }
            None => None,
        }
    }
}
