pub mod rigid;
pub mod state;

pub use rigid::derivatives;
pub use state::{Deriv, EngineCommand, SimConfig, State};
