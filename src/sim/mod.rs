pub mod event;
pub mod integrator;
pub mod runner;

pub use integrator::rk4_step;
pub use runner::{simulate, simulate_with, FlightPlan, Segment, TickLog};
