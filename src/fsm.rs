/// Small state holder that remembers how long it has been in its state.
///
/// Transition rules live with whoever drives the machine; this type only
/// records the current state, the one before it, and the time spent since the
/// last change.
#[derive(Debug, Clone)]
pub struct StateMachine<S: Copy + PartialEq> {
    state: S,
    previous: S,
    /// Seconds in the current state.
    elapsed: f32,
    entered_this_frame: bool,
}

impl<S: Copy + PartialEq> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            previous: initial,
            elapsed: 0.0,
            entered_this_frame: true,
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    pub fn previous(&self) -> S {
        self.previous
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Switch to `next` unless already there. Returns whether it switched.
    pub fn go(&mut self, next: S) -> bool {
        if next == self.state {
            return false;
        }
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.entered_this_frame = true;
        true
    }

    /// Advance the in-state timer. Call once per frame after transitions.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_frame = false;
    }

    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }
}
