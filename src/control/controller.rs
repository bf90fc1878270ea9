use crate::dynamics::state::{EngineCommand, State};
use crate::vehicle::HoverCraft;
use crate::world::Environment;

use super::attitude::PilotInput;

/// Trait for hover-craft flight controllers.
///
/// Implement this to plug custom control logic into the simulation loop.
pub trait Controller {
    /// Compute per-engine commands from the current vessel state.
    /// Called exactly once per fixed physics step.
    fn control(
        &mut self,
        state: &State,
        craft: &HoverCraft,
        env: &Environment,
        pilot: &PilotInput,
        dt: f64,
    ) -> Vec<EngineCommand>;

    /// Reset controller internal state (e.g. PID integrators).
    fn reset(&mut self) {}

    /// Mean commanded hover height, if the controller regulates one.
    /// Used for telemetry only.
    fn target_height(&self) -> Option<f64> {
        None
    }

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
