pub mod control;
pub mod dynamics;
pub mod io;
pub mod sim;
pub mod vehicle;
pub mod world;

// Convenience re-exports of the common types
pub mod types {
    pub use crate::control::{Controller, HeightMode, HoverControlSystem, PilotInput};
    pub use crate::dynamics::state::{EngineCommand, SimConfig, State};
    pub use crate::sim::runner::{FlightPlan, TickLog};
    pub use crate::vehicle::{HoverCraft, HoverEngine};
    pub use crate::world::{Body, Environment, Terrain};
}
