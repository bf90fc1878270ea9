use crate::dynamics::state::State;
use crate::world::Environment;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Height-hold has kept the craft inside its band long enough.
    Settled { target: f64 },
    Touchdown,
    Custom(String),
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: State,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &State, current: &State, env: &Environment) -> Option<EventKind>;
}

fn agl(state: &State, env: &Environment) -> f64 {
    state.pos.z - env.terrain.contact_height(state.pos.x, state.pos.y, env.body.has_ocean)
}

/// Detects ground contact after the craft has been airborne.
pub struct TouchdownDetector {
    armed: bool,
    fired: bool,
}

impl TouchdownDetector {
    pub fn new() -> Self {
        Self { armed: false, fired: false }
    }
}

impl Default for TouchdownDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDetector for TouchdownDetector {
    fn check(&mut self, _prev: &State, current: &State, env: &Environment) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let clearance = agl(current, env);
        if clearance > 0.5 {
            self.armed = true;
        }
        if self.armed && clearance <= 0.05 {
            self.fired = true;
            Some(EventKind::Touchdown)
        } else {
            None
        }
    }
}

/// Fires once when the craft has stayed within a band of the target
/// clearance for a hold duration.
pub struct SettleDetector {
    pub target: f64,
    pub band: f64,
    pub hold: f64,
    held: f64,
    fired: bool,
}

impl SettleDetector {
    pub fn new(target: f64, band: f64, hold: f64) -> Self {
        Self { target, band, hold, held: 0.0, fired: false }
    }
}

impl EventDetector for SettleDetector {
    fn check(&mut self, prev: &State, current: &State, env: &Environment) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let clearance = agl(current, env);
        if (clearance - self.target).abs() <= self.band {
            self.held += current.time - prev.time;
            if self.held >= self.hold {
                self.fired = true;
                return Some(EventKind::Settled { target: self.target });
            }
        } else {
            self.held = 0.0;
        }
        None
    }
}
