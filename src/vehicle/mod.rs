pub mod craft;
pub mod engine;

pub use craft::{presets, CraftBuilder, HoverCraft};
pub use engine::{EngineBuilder, HoverEngine};
