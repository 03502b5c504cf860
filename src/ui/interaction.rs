use crate::config::SectionKind;
use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    /// Free driving.
    Roaming,
    /// Info panel open; the car ignores controls.
    Open(SectionKind),
    /// Panel just closed; new panels are refused until the timer runs out.
    Cooldown,
}

/// Panel open/close flow for section plates.
pub struct Interaction {
    fsm: StateMachine<InteractionState>,
    cooldown_secs: f32,
}

impl Interaction {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            fsm: StateMachine::new(InteractionState::Roaming),
            cooldown_secs: cooldown_ms as f32 / 1000.0,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.fsm.state()
    }

    pub fn is_car_locked(&self) -> bool {
        matches!(self.fsm.state(), InteractionState::Open(_))
    }

    pub fn open_section(&self) -> Option<SectionKind> {
        match self.fsm.state() {
            InteractionState::Open(kind) => Some(kind),
            _ => None,
        }
    }

    /// Open the panel for the plate in range. Refused while a panel is open,
    /// during cooldown, or when no plate is in range.
    pub fn trigger(&mut self, in_range: Option<SectionKind>) -> Option<SectionKind> {
        let kind = in_range?;
        if self.fsm.state() != InteractionState::Roaming {
            return None;
        }
        self.fsm.go(InteractionState::Open(kind));
        tracing::info!(section = ?kind, "panel opened");
        Some(kind)
    }

    /// Close the open panel and start the cooldown.
    pub fn close(&mut self) -> Option<SectionKind> {
        let kind = self.open_section()?;
        self.fsm.go(InteractionState::Cooldown);
        tracing::info!(section = ?kind, "panel closed");
        Some(kind)
    }

    /// Toggle: close when open, otherwise try to open.
    pub fn toggle(&mut self, in_range: Option<SectionKind>) {
        if self.is_car_locked() {
            self.close();
        } else {
            self.trigger(in_range);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.fsm.just_entered() {
            tracing::trace!(state = ?self.fsm.state(), "interaction state entered");
        }
        self.fsm.tick(dt);
        if self.fsm.state() == InteractionState::Cooldown && self.fsm.elapsed() >= self.cooldown_secs
        {
            self.fsm.go(InteractionState::Roaming);
            tracing::debug!(after = ?self.fsm.previous(), "panels available again");
        }
    }
}
